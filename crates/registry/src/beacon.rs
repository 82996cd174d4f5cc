//! Beacon registration bookkeeping.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use coldwire_core::BeaconId;

/// A registered beacon: who registered it, and when.
#[derive(Debug, Clone, Serialize)]
pub struct Beacon {
    pub id: BeaconId,
    pub username: String,
    pub registered_at: DateTime<Utc>,
}

/// In-memory roster of registered beacons.
///
/// Ids are assigned sequentially from zero, matching the non-negative
/// integer identifiers commands are keyed by.
#[derive(Debug, Default)]
pub struct BeaconRoster {
    beacons: RwLock<Vec<Beacon>>,
}

impl BeaconRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a beacon for a user, assigning the next id.
    pub fn register(&self, username: &str) -> Beacon {
        let mut beacons = self.beacons.write().unwrap_or_else(|e| e.into_inner());
        let id = BeaconId::new(beacons.len() as i64).expect("roster length is non-negative");
        let beacon = Beacon {
            id,
            username: username.to_string(),
            registered_at: Utc::now(),
        };
        beacons.push(beacon.clone());
        beacon
    }

    pub fn exists(&self, id: BeaconId) -> bool {
        let beacons = self.beacons.read().unwrap_or_else(|e| e.into_inner());
        (id.as_i64() as usize) < beacons.len()
    }

    pub fn get(&self, id: BeaconId) -> Option<Beacon> {
        let beacons = self.beacons.read().unwrap_or_else(|e| e.into_inner());
        beacons.get(id.as_i64() as usize).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_assigns_sequential_ids() {
        let roster = BeaconRoster::new();
        let a = roster.register("alice");
        let b = roster.register("alice");

        assert_eq!(a.id.as_i64(), 0);
        assert_eq!(b.id.as_i64(), 1);
        assert!(roster.exists(a.id));
        assert!(roster.exists(b.id));
        assert!(!roster.exists(BeaconId::new(2).unwrap()));
    }

    #[test]
    fn get_returns_the_registered_record() {
        let roster = BeaconRoster::new();
        let beacon = roster.register("bob");
        let fetched = roster.get(beacon.id).unwrap();
        assert_eq!(fetched.username, "bob");
    }
}
