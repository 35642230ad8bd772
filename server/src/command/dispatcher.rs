//! Message dispatcher routing client envelopes to their handlers

use std::sync::Arc;
use std::time::Duration;

use aerolink_shared::codec::{self, CodecError};
use aerolink_shared::envelope::{
    CameraControl, ClientMessage, ConnectDrone, DisconnectDrone, GimbalControl, JoystickControl,
    StartTelemetry,
};
use aerolink_shared::{ServerMessage, DEMO_DRONE_ID};
use tracing::debug;

use crate::config::RelayConfig;
use crate::fleet::{DroneStore, TelemetrySource};
use crate::session::{SessionHandle, SessionManager};

/// Routes inbound envelopes to their handlers
///
/// No handler may fail past this boundary: malformed input is answered with
/// an error envelope and everything else degrades to dropped messages.
pub struct Dispatcher {
    sessions: Arc<SessionManager>,
    drones: Arc<dyn DroneStore>,
    feed: Arc<dyn TelemetrySource>,
    config: RelayConfig,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(
        sessions: Arc<SessionManager>,
        drones: Arc<dyn DroneStore>,
        feed: Arc<dyn TelemetrySource>,
        config: RelayConfig,
    ) -> Self {
        Self {
            sessions,
            drones,
            feed,
            config,
        }
    }

    /// Greet a freshly registered client
    pub async fn on_connect(&self, handle: &SessionHandle) {
        let drones = self.drones.drone_ids().await;
        handle.send(&ServerMessage::welcome(&handle.client_id, drones));
    }

    /// Decode and route one inbound text frame
    pub async fn on_message(&self, handle: &SessionHandle, text: &str) {
        let msg = match codec::decode(text) {
            Ok(msg) => msg,
            Err(err @ CodecError::UnknownType(_)) => {
                handle.send(&ServerMessage::error(err.to_string()));
                return;
            }
            Err(err) => {
                debug!("Rejected message from {}: {}", handle.client_id, err);
                handle.send(&ServerMessage::error("Invalid message format"));
                return;
            }
        };

        match msg {
            ClientMessage::ConnectDrone(req) => self.handle_connect_drone(handle, req).await,
            ClientMessage::DisconnectDrone(req) => self.handle_disconnect_drone(handle, req).await,
            ClientMessage::StartTelemetry(req) => self.handle_start_telemetry(handle, req).await,
            ClientMessage::StopTelemetry => self.handle_stop_telemetry(handle).await,
            ClientMessage::JoystickControl(req) => self.handle_joystick_control(handle, req).await,
            ClientMessage::CameraControl(req) => self.handle_camera_control(handle, req).await,
            ClientMessage::GimbalControl(req) => self.handle_gimbal_control(handle, req).await,
        }
    }

    async fn handle_connect_drone(&self, handle: &SessionHandle, req: ConnectDrone) {
        if !self.drones.contains(&req.drone_id).await {
            handle.send(&ServerMessage::error(format!(
                "Drone {} not available",
                req.drone_id
            )));
            return;
        }

        // Simulates the latency of a real drone link handshake
        let handle = handle.clone();
        let delay = self.config.connect_latency;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.send(&ServerMessage::drone_connected(&req.drone_id));
        });
    }

    async fn handle_disconnect_drone(&self, handle: &SessionHandle, req: DisconnectDrone) {
        let handle = handle.clone();
        let delay = self.config.disconnect_latency;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.send(&ServerMessage::drone_disconnected(&req.drone_id));
        });
    }

    async fn handle_start_telemetry(&self, handle: &SessionHandle, req: StartTelemetry) {
        // Starting twice replaces the stream, never stacks it
        self.handle_stop_telemetry(handle).await;

        // A zero-period ticker is invalid
        let interval = req.interval.max(1);

        let task = tokio::spawn(stream_telemetry(
            handle.clone(),
            self.drones.clone(),
            self.feed.clone(),
            req.drone_id.clone(),
            interval,
        ));

        if !self.sessions.set_telemetry(&handle.client_id, task).await {
            // Session disappeared between dispatch and registration
            return;
        }

        handle.send(&ServerMessage::telemetry_started(&req.drone_id, interval));
    }

    async fn handle_stop_telemetry(&self, handle: &SessionHandle) {
        if self.sessions.clear_telemetry(&handle.client_id).await {
            handle.send(&ServerMessage::telemetry_stopped());
        }
    }

    async fn handle_joystick_control(&self, handle: &SessionHandle, req: JoystickControl) {
        handle.send(&ServerMessage::joystick_ack(&req));

        // Placeholder physics, not a flight model
        if let Some(mut record) = self.drones.get(&req.drone_id).await {
            record.speed.horizontal = req.pitch.abs() / 10.0;
            record.speed.vertical = req.throttle / 10.0;
            self.drones.upsert(record).await;
        }
    }

    async fn handle_camera_control(&self, handle: &SessionHandle, req: CameraControl) {
        handle.send(&ServerMessage::camera_ack(&req));
    }

    async fn handle_gimbal_control(&self, handle: &SessionHandle, req: GimbalControl) {
        handle.send(&ServerMessage::gimbal_ack(&req));
    }
}

/// Periodic telemetry job for one session
///
/// Runs until aborted through the session manager. Unknown drone ids fall
/// back to the demo drone.
async fn stream_telemetry(
    handle: SessionHandle,
    drones: Arc<dyn DroneStore>,
    feed: Arc<dyn TelemetrySource>,
    drone_id: String,
    interval_ms: u64,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
    // The ticker's first tick completes immediately; skip it so the first
    // frame lands one period after the start request.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let record = match drones.get(&drone_id).await {
            Some(record) => Some(record),
            None => drones.get(DEMO_DRONE_ID).await,
        };
        let Some(mut record) = record else { continue };

        feed.advance(&mut record);
        drones.upsert(record.clone()).await;
        handle.send(&ServerMessage::telemetry(&drone_id, record));
    }
}
