//! Mediaflow Infrastructure Library
//!
//! Shared process setup for the Mediaflow binaries:
//! - Telemetry initialization (tracing subscriber, plain or JSON output)

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, LogFormat, TelemetrySettings};
