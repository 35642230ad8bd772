//! Inbound message dispatch for the relay
//!
//! This module handles:
//! - Routing inbound envelopes to per-type handlers
//! - Simulated drone connect/disconnect acknowledgements
//! - Per-session telemetry job lifecycle

mod dispatcher;

pub use dispatcher::Dispatcher;
