//! Mediaflow Core Library
//!
//! This crate provides the domain models, configuration, notification parsing and
//! error types shared across all Mediaflow components.

pub mod config;
pub mod error;
pub mod event;
pub mod models;

// Re-export commonly used types
pub use config::{
    BackupConfig, Config, Dimensions, QualityPreset, ResizeDefinition, StackConfig,
    TranscodeBackend, TranscodeConfig, VariantFormat, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH,
};
pub use error::{ConfigError, EventError};
pub use event::{parse_event, summarize};
pub use models::{
    ArchiveStep, CopySpec, FailureKind, MediaKind, PreviewSpec, TerminalResult, TranscodeSpec,
    UploadRecord, VideoJobDescriptor,
};
