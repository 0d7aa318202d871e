use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use super::ArchiveStep;

pub const IMAGE_ALREADY_PROCESSED_MSG: &str = "Image already processed";
pub const IMAGE_BROKEN_OR_FOLDER_MSG: &str = "Image file is broken or it's a folder";
pub const VIDEO_ARCHIVED_MSG: &str = "Video archived and transcode job submitted";

/// Classified failure of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Notification could not be parsed; nothing was touched.
    UnsupportedEvent,
    /// Settings document missing or invalid; nothing was touched.
    ConfigError,
    /// Image pipeline failed.
    ProcessingError,
    /// Archival copy failed; original untouched.
    CopyError,
    /// Copy done, original still present.
    DeleteError,
    /// Video archived, transcode job not accepted.
    TranscodeSubmitError,
}

impl FailureKind {
    /// Machine-readable error code
    pub fn error_code(self) -> &'static str {
        match self {
            FailureKind::UnsupportedEvent => "UNSUPPORTED_EVENT",
            FailureKind::ConfigError => "CONFIG_ERROR",
            FailureKind::ProcessingError => "PROCESSING_ERROR",
            FailureKind::CopyError => "COPY_ERROR",
            FailureKind::DeleteError => "DELETE_ERROR",
            FailureKind::TranscodeSubmitError => "TRANSCODE_SUBMIT_ERROR",
        }
    }

    /// Some remote step already completed and was kept.
    pub fn is_degraded(self) -> bool {
        matches!(
            self,
            FailureKind::DeleteError | FailureKind::TranscodeSubmitError
        )
    }

    /// Step an external retry should resume the video chain at.
    pub fn resume_step(self) -> Option<ArchiveStep> {
        match self {
            FailureKind::CopyError => Some(ArchiveStep::Copy),
            FailureKind::DeleteError => Some(ArchiveStep::Delete),
            FailureKind::TranscodeSubmitError => Some(ArchiveStep::Transcode),
            _ => None,
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.error_code())
    }
}

/// The single externally observable outcome of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TerminalResult {
    Success { message: String },
    Failure { kind: FailureKind, detail: String },
}

impl TerminalResult {
    pub fn success(message: impl Into<String>) -> Self {
        TerminalResult::Success {
            message: message.into(),
        }
    }

    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        TerminalResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// `OK, N images were processed.`
    pub fn images_processed(count: usize) -> Self {
        Self::success(format!("OK, {} images were processed.", count))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminalResult::Success { .. })
    }

    /// Failure after which some work was kept (see [`FailureKind::is_degraded`]).
    pub fn is_degraded(&self) -> bool {
        self.failure_kind().is_some_and(FailureKind::is_degraded)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            TerminalResult::Success { .. } => None,
            TerminalResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Success message or failure detail.
    pub fn message(&self) -> &str {
        match self {
            TerminalResult::Success { message } => message,
            TerminalResult::Failure { detail, .. } => detail,
        }
    }

    /// Host-facing shape: success message or error description.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            TerminalResult::Success { message } => Ok(message),
            TerminalResult::Failure { kind, detail } => Err(format!("{}: {}", kind, detail)),
        }
    }
}

impl Display for TerminalResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TerminalResult::Success { message } => write!(f, "{}", message),
            TerminalResult::Failure { kind, detail } => write!(f, "{}: {}", kind, detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_processed_message() {
        assert_eq!(
            TerminalResult::images_processed(2).message(),
            "OK, 2 images were processed."
        );
    }

    #[test]
    fn test_degraded_kinds() {
        assert!(!FailureKind::CopyError.is_degraded());
        assert!(FailureKind::DeleteError.is_degraded());
        assert!(FailureKind::TranscodeSubmitError.is_degraded());
        assert!(!FailureKind::UnsupportedEvent.is_degraded());
        assert!(!TerminalResult::success(VIDEO_ARCHIVED_MSG).is_degraded());
    }

    #[test]
    fn test_resume_step() {
        assert_eq!(FailureKind::CopyError.resume_step(), Some(ArchiveStep::Copy));
        assert_eq!(
            FailureKind::DeleteError.resume_step(),
            Some(ArchiveStep::Delete)
        );
        assert_eq!(FailureKind::ProcessingError.resume_step(), None);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(
            TerminalResult::success("done").into_result(),
            Ok("done".to_string())
        );
        assert_eq!(
            TerminalResult::failure(FailureKind::CopyError, "access denied").into_result(),
            Err("COPY_ERROR: access denied".to_string())
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json =
            serde_json::to_value(TerminalResult::failure(FailureKind::DeleteError, "x")).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "delete_error");
    }
}
