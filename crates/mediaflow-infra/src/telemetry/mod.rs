//! Telemetry initialization
//!
//! Logs go to stdout. On Lambda they are picked up by CloudWatch, where the JSON
//! format keeps the structured fields queryable.

mod init_basic;

pub use init_basic::{init_telemetry, LogFormat, TelemetrySettings};
