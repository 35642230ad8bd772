//! Simulated telemetry feed
//!
//! Stand-in for a real telemetry link. Attitude and speed follow smooth
//! curves keyed to wall-clock time, so every observer of the same drone
//! sees a consistent flight.

use aerolink_shared::{now_ms, DroneRecord};

/// Battery percentage drained per tick
const BATTERY_DRAIN_PER_TICK: f64 = 0.01;
/// Maximum altitude jitter per tick, in meters
const ALTITUDE_JITTER_M: f64 = 0.1;
/// Yaw advance per tick, in degrees
const YAW_STEP_DEG: f64 = 0.1;

/// Source of telemetry samples for a drone record
pub trait TelemetrySource: Send + Sync {
    /// Advance the record by one sample
    fn advance(&self, record: &mut DroneRecord);
}

/// Pseudo-random flight curve generator
pub struct SimulatedFeed;

impl TelemetrySource for SimulatedFeed {
    fn advance(&self, record: &mut DroneRecord) {
        let now = now_ms();
        let t = now as f64;

        record.battery = (record.battery - BATTERY_DRAIN_PER_TICK).max(0.0);
        record.position.altitude += (rand::random::<f64>() - 0.5) * ALTITUDE_JITTER_M;
        record.attitude.pitch = (t / 5000.0).sin() * 5.0;
        record.attitude.roll = (t / 7000.0).sin() * 3.0;
        record.attitude.yaw = (record.attitude.yaw + YAW_STEP_DEG) % 360.0;
        record.speed.horizontal = ((t / 10000.0).sin() * 10.0).abs();
        record.last_updated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_drains_and_clamps_at_zero() {
        let feed = SimulatedFeed;
        let mut record = DroneRecord::demo();

        feed.advance(&mut record);
        assert!(record.battery < 85.0);

        record.battery = 0.004;
        feed.advance(&mut record);
        assert_eq!(record.battery, 0.0);
        feed.advance(&mut record);
        assert_eq!(record.battery, 0.0);
    }

    #[test]
    fn test_attitude_follows_bounded_curves() {
        let feed = SimulatedFeed;
        let mut record = DroneRecord::demo();

        for _ in 0..100 {
            feed.advance(&mut record);
            assert!(record.attitude.pitch.abs() <= 5.0);
            assert!(record.attitude.roll.abs() <= 3.0);
            assert!((0.0..360.0).contains(&record.attitude.yaw));
            assert!(record.speed.horizontal >= 0.0);
            assert!(record.speed.horizontal <= 10.0);
        }
    }

    #[test]
    fn test_yaw_wraps_around() {
        let feed = SimulatedFeed;
        let mut record = DroneRecord::demo();
        record.attitude.yaw = 359.95;

        feed.advance(&mut record);
        assert!((0.0..360.0).contains(&record.attitude.yaw));
    }

    #[test]
    fn test_altitude_jitter_is_bounded() {
        let feed = SimulatedFeed;
        let mut record = DroneRecord::demo();

        for _ in 0..100 {
            let before = record.position.altitude;
            feed.advance(&mut record);
            assert!((record.position.altitude - before).abs() <= ALTITUDE_JITTER_M / 2.0);
        }
    }

    #[test]
    fn test_last_updated_is_stamped() {
        let feed = SimulatedFeed;
        let mut record = DroneRecord::demo();
        record.last_updated = 0;

        feed.advance(&mut record);
        assert!(record.last_updated > 0);
    }
}
