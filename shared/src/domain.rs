use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceAttendance {
    pub id: String,
    pub value: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceLocation {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}
