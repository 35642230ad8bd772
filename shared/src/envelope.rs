//! Typed message envelopes for the relay wire protocol
//!
//! Every message travels as a JSON envelope `{ "type": "...", "data": { ... } }`.
//! The tagged enums below give the dispatcher exhaustive, compiler-checked
//! routing over the message types instead of a stringly-typed switch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drone::{DroneRecord, DroneStatus};
use crate::{now_ms, timing};

fn default_interval() -> u64 {
    timing::DEFAULT_TELEMETRY_INTERVAL_MS
}

fn default_gimbal_mode() -> String {
    "follow".to_string()
}

/// Messages sent by mission-control clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    ConnectDrone(ConnectDrone),
    DisconnectDrone(DisconnectDrone),
    StartTelemetry(StartTelemetry),
    StopTelemetry,
    JoystickControl(JoystickControl),
    CameraControl(CameraControl),
    GimbalControl(GimbalControl),
}

/// Request to establish a link to a drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectDrone {
    pub drone_id: String,
}

/// Request to drop the link to a drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectDrone {
    pub drone_id: String,
}

/// Request to (re)start a periodic telemetry stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTelemetry {
    pub drone_id: String,
    /// Tick period in milliseconds
    #[serde(default = "default_interval")]
    pub interval: u64,
}

/// Raw joystick axes; missing axes are neutral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoystickControl {
    pub drone_id: String,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub throttle: f64,
}

/// Camera action with optional free-form settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraControl {
    pub drone_id: String,
    pub action: String,
    #[serde(default)]
    pub settings: Option<Value>,
}

/// Gimbal target angles and tracking mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GimbalControl {
    pub drone_id: String,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default = "default_gimbal_mode")]
    pub mode: String,
}

/// Messages sent by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome(Welcome),
    Error(ErrorReport),
    DroneConnected(LinkUpdate),
    DroneDisconnected(LinkUpdate),
    TelemetryStarted(TelemetryStarted),
    TelemetryStopped(TelemetryStopped),
    Telemetry(TelemetryFrame),
    JoystickAck(JoystickAck),
    CameraAck(CameraAck),
    GimbalAck(GimbalAck),
}

/// Greeting sent to every freshly registered client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub message: String,
    pub client_id: String,
    pub available_drones: Vec<String>,
}

/// Client-visible failure report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
}

/// Result of a simulated drone connect or disconnect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUpdate {
    pub drone_id: String,
    pub status: DroneStatus,
    pub message: String,
}

/// Acknowledgement that a telemetry stream is running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryStarted {
    pub drone_id: String,
    pub interval: u64,
    pub message: String,
}

/// Acknowledgement that a telemetry stream was cancelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryStopped {
    pub message: String,
}

/// One tick of a telemetry stream: stream metadata plus the full record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFrame {
    pub drone_id: String,
    pub timestamp: u64,
    #[serde(flatten)]
    pub record: DroneRecord,
}

/// Echo of the joystick inputs a client sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoystickAck {
    pub drone_id: String,
    pub timestamp: u64,
    pub controls: JoystickAxes,
    pub status: AckStatus,
}

/// Joystick axes as applied by the relay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoystickAxes {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub throttle: f64,
}

/// Echo of a camera command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraAck {
    pub drone_id: String,
    pub timestamp: u64,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    pub status: AckStatus,
}

/// Echo of a gimbal command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GimbalAck {
    pub drone_id: String,
    pub timestamp: u64,
    pub position: GimbalAngles,
    pub mode: String,
    pub status: AckStatus,
}

/// Gimbal angles as applied by the relay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GimbalAngles {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// Command acknowledgement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Received,
    Executed,
}

/// Builder helpers for the relay's outbound messages
impl ServerMessage {
    /// Greeting for a freshly registered client
    pub fn welcome(client_id: impl Into<String>, available_drones: Vec<String>) -> Self {
        Self::Welcome(Welcome {
            message: "Connected to AeroLink relay".into(),
            client_id: client_id.into(),
            available_drones,
        })
    }

    /// Client-visible error report
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorReport {
            message: message.into(),
        })
    }

    /// Successful drone connect acknowledgement
    pub fn drone_connected(drone_id: &str) -> Self {
        Self::DroneConnected(LinkUpdate {
            drone_id: drone_id.into(),
            status: DroneStatus::Connected,
            message: format!("Successfully connected to drone {}", drone_id),
        })
    }

    /// Successful drone disconnect acknowledgement
    pub fn drone_disconnected(drone_id: &str) -> Self {
        Self::DroneDisconnected(LinkUpdate {
            drone_id: drone_id.into(),
            status: DroneStatus::Disconnected,
            message: format!("Successfully disconnected from drone {}", drone_id),
        })
    }

    /// Acknowledgement that a telemetry stream is running
    pub fn telemetry_started(drone_id: &str, interval: u64) -> Self {
        Self::TelemetryStarted(TelemetryStarted {
            drone_id: drone_id.into(),
            interval,
            message: format!("Telemetry stream started for drone {}", drone_id),
        })
    }

    /// Acknowledgement that a telemetry stream was cancelled
    pub fn telemetry_stopped() -> Self {
        Self::TelemetryStopped(TelemetryStopped {
            message: "Telemetry stream stopped".into(),
        })
    }

    /// One telemetry tick for a stream
    pub fn telemetry(drone_id: &str, record: DroneRecord) -> Self {
        Self::Telemetry(TelemetryFrame {
            drone_id: drone_id.into(),
            timestamp: now_ms(),
            record,
        })
    }

    /// Echo a joystick command back to its sender
    pub fn joystick_ack(req: &JoystickControl) -> Self {
        Self::JoystickAck(JoystickAck {
            drone_id: req.drone_id.clone(),
            timestamp: now_ms(),
            controls: JoystickAxes {
                pitch: req.pitch,
                roll: req.roll,
                yaw: req.yaw,
                throttle: req.throttle,
            },
            status: AckStatus::Received,
        })
    }

    /// Echo a camera command back to its sender
    pub fn camera_ack(req: &CameraControl) -> Self {
        Self::CameraAck(CameraAck {
            drone_id: req.drone_id.clone(),
            timestamp: now_ms(),
            action: req.action.clone(),
            settings: req.settings.clone(),
            status: AckStatus::Executed,
        })
    }

    /// Echo a gimbal command back to its sender
    pub fn gimbal_ack(req: &GimbalControl) -> Self {
        Self::GimbalAck(GimbalAck {
            drone_id: req.drone_id.clone(),
            timestamp: now_ms(),
            position: GimbalAngles {
                pitch: req.pitch,
                roll: req.roll,
                yaw: req.yaw,
            },
            mode: req.mode.clone(),
            status: AckStatus::Executed,
        })
    }
}
