use devtrack_shared::LiveEvent;
use tracing::info;

use crate::{error::UpdateError, state::AppState};

/// Boolean literals accepted for `value`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// `inf`, `infinity` or `nan` in any case, optionally signed.
fn spells_non_finite(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|word| unsigned.eq_ignore_ascii_case(word))
}

/// A decimal that overflows `f64` is out of range, not infinity.
fn parse_coordinate(raw: &str, name: &'static str) -> Result<f64, UpdateError> {
    let value: f64 = raw.parse().map_err(|_| UpdateError::InvalidNumber(name))?;
    if value.is_finite() || spells_non_finite(raw) {
        Ok(value)
    } else {
        Err(UpdateError::InvalidNumber(name))
    }
}

pub fn handle_attendance(
    state: &AppState,
    id: &str,
    raw_value: &str,
) -> Result<String, UpdateError> {
    if id.is_empty() {
        return Err(UpdateError::MissingField("id"));
    }
    if raw_value.is_empty() {
        return Err(UpdateError::MissingField("value"));
    }
    let value = parse_bool(raw_value).ok_or(UpdateError::InvalidBoolean)?;

    state.store.set_attendance(id, value);
    info!(device = id, value, "attendance updated");

    let message = format!("Device {id} set to {value}");
    state.broker.publish(LiveEvent::update(message.clone()));
    Ok(message)
}

pub fn handle_location(
    state: &AppState,
    id: &str,
    raw_lat: &str,
    raw_lon: &str,
) -> Result<String, UpdateError> {
    if id.is_empty() {
        return Err(UpdateError::MissingField("id"));
    }
    let lat = parse_coordinate(raw_lat, "lat")?;
    let lon = parse_coordinate(raw_lon, "lon")?;

    state.store.set_location(id, lat, lon);
    info!(device = id, "GPS update at {lat:.6}, {lon:.6}");

    let message = format!("GPS updated for {id}: {lat:.6}, {lon:.6}");
    state.broker.publish(LiveEvent::gps(message.clone()));
    Ok(message)
}
