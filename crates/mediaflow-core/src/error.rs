//! Error types module
//!
//! Errors raised before any remote operation is attempted: loading the settings
//! document and parsing the upload notification. Both are fail-fast and carry
//! no side effects.

use std::io;
use std::path::PathBuf;

/// Settings document errors. Always fatal for the invocation (or process start).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing required config key: {0}")]
    Missing(&'static str),

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Upload notification errors. Mapped to `FailureKind::UnsupportedEvent`.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event payload is not a JSON object")]
    NotAnObject,

    #[error("Event has no records")]
    NoRecords,

    #[error("Event is missing {0}")]
    MissingField(&'static str),

    #[error("Event has an empty {0}")]
    EmptyField(&'static str),

    #[error("Invalid object key encoding: {0}")]
    InvalidKey(String),

    #[error("Invalid SNS message: {0}")]
    InvalidSnsMessage(String),

    #[error("Event is not an object creation: {0}")]
    NotAnUpload(String),

    #[error("Unrecognized event shape")]
    UnrecognizedShape,
}
