use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use devtrack_shared::{DeviceAttendance, DeviceLocation};

/// Last known attendance flag and location per device.
///
/// Each map has its own lock and every lock is held for exactly one map
/// access. Entries are replaced whole, so a reader never sees half of an
/// update and a poisoned lock can be recovered safely.
#[derive(Default)]
pub struct StateStore {
    attendance: Mutex<HashMap<String, bool>>,
    locations: Mutex<HashMap<String, DeviceLocation>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attendance(&self, id: &str, value: bool) {
        lock(&self.attendance).insert(id.to_owned(), value);
    }

    pub fn set_location(&self, id: &str, lat: f64, lon: f64) {
        let location = DeviceLocation {
            id: id.to_owned(),
            lat,
            lon,
        };
        lock(&self.locations).insert(id.to_owned(), location);
    }

    pub fn attendance(&self, id: &str) -> Option<bool> {
        lock(&self.attendance).get(id).copied()
    }

    pub fn location(&self, id: &str) -> Option<DeviceLocation> {
        lock(&self.locations).get(id).cloned()
    }

    pub fn device_count(&self) -> usize {
        lock(&self.attendance).len()
    }

    pub fn location_count(&self) -> usize {
        lock(&self.locations).len()
    }

    /// All attendance flags, sorted by device id.
    pub fn attendance_snapshot(&self) -> Vec<DeviceAttendance> {
        let mut devices: Vec<_> = lock(&self.attendance)
            .iter()
            .map(|(id, &value)| DeviceAttendance {
                id: id.clone(),
                value,
            })
            .collect();
        devices.sort();
        devices
    }

    /// All locations, sorted by device id.
    pub fn location_snapshot(&self) -> Vec<DeviceLocation> {
        let mut locations: Vec<_> = lock(&self.locations).values().cloned().collect();
        locations.sort_by(|a, b| a.id.cmp(&b.id));
        locations
    }
}
