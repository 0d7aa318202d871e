//! Upload notification dispatcher
//!
//! `handle` is the single entry point per invocation. Every path through it ends
//! in exactly one [`TerminalResult`]; collaborator errors never escape as `Err`.

use serde_json::Value;
use std::time::Instant;

use mediaflow_core::models::{IMAGE_ALREADY_PROCESSED_MSG, IMAGE_BROKEN_OR_FOLDER_MSG};
use mediaflow_core::{
    parse_event, summarize, ArchiveStep, Config, FailureKind, MediaKind, TerminalResult,
    UploadRecord,
};
use mediaflow_processing::ImageProcessingError;

use crate::context::{ConfigSource, HandlerContext};

pub struct Dispatcher {
    context: HandlerContext,
    config: ConfigSource,
}

impl Dispatcher {
    pub fn new(context: HandlerContext, config: impl Into<ConfigSource>) -> Self {
        Self {
            context,
            config: config.into(),
        }
    }

    /// Parse, load settings, classify, run one pipeline.
    pub async fn handle(&self, event: &Value) -> TerminalResult {
        let start = Instant::now();

        let record = match parse_event(event) {
            Ok(record) => record,
            Err(e) => {
                let summary = summarize(event);
                tracing::warn!(error = %e, event = %summary, "Unsupported or invalid event");
                return TerminalResult::failure(
                    FailureKind::UnsupportedEvent,
                    format!("Unsupported or invalid event ({}): {}", e, summary),
                );
            }
        };

        let config = match self.config.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Config load failed");
                return TerminalResult::failure(FailureKind::ConfigError, e.to_string());
            }
        };

        let kind = record.media_kind(&config);
        tracing::info!(
            bucket = %record.bucket_name(),
            key = %record.object_key(),
            media_kind = ?kind,
            "Handling upload"
        );

        let result = match kind {
            MediaKind::Image => self.process_image(&record, &config).await,
            MediaKind::Video => self.context.video_archiver().archive(&record, &config).await,
        };

        log_result(&record, &result, start);
        result
    }

    /// Re-run the video chain from `from`, reusing `job_id`.
    pub async fn resume_video(
        &self,
        record: &UploadRecord,
        job_id: &str,
        from: ArchiveStep,
    ) -> TerminalResult {
        let start = Instant::now();

        let config = match self.config.load() {
            Ok(config) => config,
            Err(e) => return TerminalResult::failure(FailureKind::ConfigError, e.to_string()),
        };

        let result = match self
            .context
            .video_archiver()
            .resume(record, &config, job_id, from)
            .await
        {
            Ok(report) => report.into_terminal(),
            Err(e) => TerminalResult::failure(FailureKind::UnsupportedEvent, e.to_string()),
        };

        log_result(record, &result, start);
        result
    }

    async fn process_image(&self, record: &UploadRecord, config: &Config) -> TerminalResult {
        match self.context.image_processor.run(record, config).await {
            Ok(count) => TerminalResult::images_processed(count),
            Err(ImageProcessingError::AlreadyProcessed) => {
                TerminalResult::success(IMAGE_ALREADY_PROCESSED_MSG)
            }
            Err(ImageProcessingError::EmptyOrBroken) => {
                TerminalResult::success(IMAGE_BROKEN_OR_FOLDER_MSG)
            }
            Err(e) => TerminalResult::failure(
                FailureKind::ProcessingError,
                format!("Error processing {}: {}", record.object_key(), e),
            ),
        }
    }
}

fn log_result(record: &UploadRecord, result: &TerminalResult, start: Instant) {
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    match result.failure_kind() {
        None => tracing::info!(
            bucket = %record.bucket_name(),
            key = %record.object_key(),
            duration_ms = duration_ms,
            "{}",
            result.message()
        ),
        Some(kind) if kind.is_degraded() => tracing::warn!(
            bucket = %record.bucket_name(),
            key = %record.object_key(),
            error_code = kind.error_code(),
            resume_step = ?kind.resume_step(),
            duration_ms = duration_ms,
            "{}",
            result.message()
        ),
        Some(kind) => tracing::error!(
            bucket = %record.bucket_name(),
            key = %record.object_key(),
            error_code = kind.error_code(),
            duration_ms = duration_ms,
            "{}",
            result.message()
        ),
    }
}
