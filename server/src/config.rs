//! Relay server configuration

use std::time::Duration;

use aerolink_shared::timing;

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the WebSocket listener binds to
    pub bind_addr: String,
    /// Simulated latency before a connect-drone acknowledgement
    pub connect_latency: Duration,
    /// Simulated latency before a disconnect-drone acknowledgement
    pub disconnect_latency: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            connect_latency: Duration::from_millis(timing::CONNECT_LATENCY_MS),
            disconnect_latency: Duration::from_millis(timing::DISCONNECT_LATENCY_MS),
        }
    }
}

impl RelayConfig {
    /// Build a config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("AEROLINK_ADDR") {
            config.bind_addr = addr;
        }
        config
    }
}
