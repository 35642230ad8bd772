//! Shared drone record store

use std::collections::HashMap;

use aerolink_shared::DroneRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Fleet-state lookup the dispatcher works against
///
/// The in-memory implementation below backs the demo deployment; a real
/// fleet-state service can be substituted without touching dispatch logic.
#[async_trait]
pub trait DroneStore: Send + Sync {
    /// Fetch a snapshot of a drone record
    async fn get(&self, drone_id: &str) -> Option<DroneRecord>;

    /// Insert or replace a drone record
    async fn upsert(&self, record: DroneRecord);

    /// Whether a drone is known to the store
    async fn contains(&self, drone_id: &str) -> bool {
        self.get(drone_id).await.is_some()
    }

    /// List all known drone ids
    async fn drone_ids(&self) -> Vec<String>;
}

/// In-memory drone store; last writer wins, no versioning
pub struct MemoryDroneStore {
    records: RwLock<HashMap<String, DroneRecord>>,
}

impl MemoryDroneStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-seeded with the demo drone
    pub fn with_demo_drone() -> Self {
        let mut records = HashMap::new();
        let demo = DroneRecord::demo();
        records.insert(demo.id.clone(), demo);
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for MemoryDroneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DroneStore for MemoryDroneStore {
    async fn get(&self, drone_id: &str) -> Option<DroneRecord> {
        self.records.read().await.get(drone_id).cloned()
    }

    async fn upsert(&self, record: DroneRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }

    async fn drone_ids(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }
}
