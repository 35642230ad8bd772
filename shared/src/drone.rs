//! Drone state records shared between the relay and its clients

use serde::{Deserialize, Serialize};

use crate::now_ms;

/// Identifier of the demo drone every deployment is seeded with
pub const DEMO_DRONE_ID: &str = "demo-drone";

/// Link status of a drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneStatus {
    Ready,
    Connected,
    Disconnected,
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// Horizontal and vertical speed components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Speed {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Full state record for a single drone
///
/// The relay holds at most one record per drone id. Records are mutated by
/// telemetry jobs and joystick handlers; last writer wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneRecord {
    pub id: String,
    pub status: DroneStatus,
    pub battery: f64,
    pub position: Position,
    pub attitude: Attitude,
    pub speed: Speed,
    pub last_updated: u64,
}

impl DroneRecord {
    /// Create a fresh record in the ready state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: DroneStatus::Ready,
            battery: 100.0,
            position: Position::default(),
            attitude: Attitude::default(),
            speed: Speed::default(),
            last_updated: now_ms(),
        }
    }

    /// The demo drone every deployment starts with
    pub fn demo() -> Self {
        Self {
            id: DEMO_DRONE_ID.into(),
            status: DroneStatus::Ready,
            battery: 85.0,
            position: Position {
                latitude: 37.7749,
                longitude: -122.4194,
                altitude: 0.0,
            },
            attitude: Attitude::default(),
            speed: Speed::default(),
            last_updated: now_ms(),
        }
    }
}
