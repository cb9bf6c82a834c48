pub mod domain;

use serde::{Deserialize, Serialize};

pub use domain::{DeviceAttendance, DeviceLocation};

/// Query of `/update`. Absent parameters stay empty so the handler can
/// report which one is missing.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct AttendanceParams {
    pub id: String,
    pub value: String,
}

/// Query of `/gps`, same shape as what Traccar clients send.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct GpsParams {
    pub id: String,
    pub lat: String,
    pub lon: String,
}

/// Sets `slot` unless an earlier pair already did.
fn keep_first(slot: &mut Option<String>, value: String) {
    slot.get_or_insert(value);
}

/// Collects decoded query pairs. A repeated key keeps its first value and
/// unknown keys are ignored.
impl FromIterator<(String, String)> for AttendanceParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let (mut id, mut value) = (None, None);
        for (key, val) in pairs {
            match key.as_str() {
                "id" => keep_first(&mut id, val),
                "value" => keep_first(&mut value, val),
                _ => {}
            }
        }
        Self {
            id: id.unwrap_or_default(),
            value: value.unwrap_or_default(),
        }
    }
}

impl FromIterator<(String, String)> for GpsParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let (mut id, mut lat, mut lon) = (None, None, None);
        for (key, val) in pairs {
            match key.as_str() {
                "id" => keep_first(&mut id, val),
                "lat" => keep_first(&mut lat, val),
                "lon" => keep_first(&mut lon, val),
                _ => {}
            }
        }
        Self {
            id: id.unwrap_or_default(),
            lat: lat.unwrap_or_default(),
            lon: lon.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Update,
    Gps,
}

/// Notification pushed to live listeners on `/events`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
}

impl LiveEvent {
    pub fn update(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Update,
            message: message.into(),
        }
    }

    pub fn gps(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Gps,
            message: message.into(),
        }
    }
}
