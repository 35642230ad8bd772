//! JSON codec for the relay wire protocol
//!
//! All messages are framed as UTF-8 text:
//! ```text
//! { "type": "<message name>", "data": { ... } }
//! ```
//!
//! Decoding never panics: every malformed input maps to a [`CodecError`] so
//! the dispatcher can answer with an error envelope instead of dropping the
//! connection.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::envelope::{ClientMessage, ServerMessage};

/// Maximum inbound message size (256 KiB) to prevent memory exhaustion
pub const MAX_MESSAGE_SIZE: usize = 256 * 1024;

/// Errors that can occur while decoding or encoding envelopes
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Message too large: {0} bytes (max: {MAX_MESSAGE_SIZE})")]
    MessageTooLarge(usize),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Message has no type field")]
    MissingType,

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error("Invalid {msg_type} payload: {source}")]
    InvalidPayload {
        msg_type: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    msg_type: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Decode an inbound client message from a text frame
pub fn decode(text: &str) -> Result<ClientMessage, CodecError> {
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(CodecError::MessageTooLarge(text.len()));
    }

    let raw: RawEnvelope = serde_json::from_str(text)?;
    let msg_type = raw.msg_type.ok_or(CodecError::MissingType)?;

    let msg = match msg_type.as_str() {
        "connect-drone" => ClientMessage::ConnectDrone(payload(&msg_type, raw.data)?),
        "disconnect-drone" => ClientMessage::DisconnectDrone(payload(&msg_type, raw.data)?),
        "start-telemetry" => ClientMessage::StartTelemetry(payload(&msg_type, raw.data)?),
        "stop-telemetry" => ClientMessage::StopTelemetry,
        "joystick-control" => ClientMessage::JoystickControl(payload(&msg_type, raw.data)?),
        "camera-control" => ClientMessage::CameraControl(payload(&msg_type, raw.data)?),
        "gimbal-control" => ClientMessage::GimbalControl(payload(&msg_type, raw.data)?),
        _ => return Err(CodecError::UnknownType(msg_type)),
    };

    Ok(msg)
}

fn payload<T: DeserializeOwned>(msg_type: &str, data: Value) -> Result<T, CodecError> {
    serde_json::from_value(data).map_err(|source| CodecError::InvalidPayload {
        msg_type: msg_type.to_string(),
        source,
    })
}

/// Encode an outbound server message as a text frame
pub fn encode(msg: &ServerMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(msg)?)
}
