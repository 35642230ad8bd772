//! Drone fleet state and telemetry simulation
//!
//! This module handles:
//! - The shared drone record store the relay mutates
//! - The pluggable telemetry source that animates records

mod sim;
mod store;

pub use sim::{SimulatedFeed, TelemetrySource};
pub use store::{DroneStore, MemoryDroneStore};
