//! AeroLink Shared Protocol Types
//!
//! This crate provides the shared protocol types and JSON codec for
//! communication between mission-control clients and the relay server.

pub mod codec;
pub mod drone;
pub mod envelope;

use std::time::{SystemTime, UNIX_EPOCH};

pub use drone::{Attitude, DroneRecord, DroneStatus, Position, Speed, DEMO_DRONE_ID};
pub use envelope::{ClientMessage, ServerMessage};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Timing parameters for the relay
pub mod timing {
    /// Default telemetry streaming interval in milliseconds
    pub const DEFAULT_TELEMETRY_INTERVAL_MS: u64 = 100;

    /// Simulated latency before a drone connect acknowledgement
    pub const CONNECT_LATENCY_MS: u64 = 1500;

    /// Simulated latency before a drone disconnect acknowledgement
    pub const DISCONNECT_LATENCY_MS: u64 = 1000;
}
