//! Collaborator traits for the pipelines

use async_trait::async_trait;
use mediaflow_core::{Config, TranscodeBackend, TranscodeSpec, UploadRecord};
use mediaflow_storage::StorageError;
use thiserror::Error;

/// Image pipeline failures
///
/// `AlreadyProcessed` and `EmptyOrBroken` are acknowledged outcomes, not errors
/// to retry; the dispatcher reports them as successes.
#[derive(Debug, Error)]
pub enum ImageProcessingError {
    #[error("Object was already processed.")]
    AlreadyProcessed,

    #[error("Empty file or directory.")]
    EmptyOrBroken,

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Processing task failed: {0}")]
    Task(String),
}

/// Generates the configured variants of an uploaded image.
#[async_trait]
pub trait ImageProcessor: Send + Sync {
    /// Returns the number of variants written.
    async fn run(&self, record: &UploadRecord, config: &Config)
        -> Result<usize, ImageProcessingError>;
}

/// Transcode submission failures
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Transcode job rejected: {0}")]
    Rejected(String),

    #[error("Transcode service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid transcode job: {0}")]
    InvalidSpec(String),
}

/// Acknowledgement of an accepted transcode job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedJob {
    /// Identifier assigned by the transcode service, if it returns one.
    pub remote_id: Option<String>,
}

/// Accepts transcode job submissions.
///
/// Implementations must be safe to call twice with the same spec: the job id in
/// the `TranscodeSpec` is the idempotency key.
#[async_trait]
pub trait TranscodeService: Send + Sync {
    async fn submit_job(&self, spec: &TranscodeSpec) -> Result<SubmittedJob, TranscodeError>;

    fn backend(&self) -> TranscodeBackend;
}
