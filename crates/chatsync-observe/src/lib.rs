//! Telemetry initialization for Chatsync binaries.

pub mod tracing_setup;
