//! Video archival state machine
//!
//! ```text
//! Start → CopyInFlight → CopySucceeded → DeleteInFlight → DeleteSucceeded → TranscodeSubmitted
//!                      ↘ CopyFailed                    ↘ DeleteFailed    ↘ TranscodeSubmitFailed
//! ```
//!
//! Every remote call is awaited before the next state is entered, so the original
//! is only deleted once the archival copy is confirmed. Nothing is rolled back:
//! a failure after the copy leaves the completed steps in place and reports the
//! step to resume at.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use serde::Serialize;

use mediaflow_core::models::VIDEO_ARCHIVED_MSG;
use mediaflow_core::{
    ArchiveStep, Config, FailureKind, TerminalResult, UploadRecord, VideoJobDescriptor,
};
use mediaflow_storage::ObjectStorage;

use crate::traits::TranscodeService;

/// States of one archival run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum ArchiveState {
    Start,
    CopyInFlight,
    CopySucceeded,
    CopyFailed(String),
    DeleteInFlight,
    DeleteSucceeded,
    DeleteFailed(String),
    TranscodeSubmitted,
    TranscodeSubmitFailed(String),
}

impl ArchiveState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ArchiveState::CopyFailed(_)
                | ArchiveState::DeleteFailed(_)
                | ArchiveState::TranscodeSubmitted
                | ArchiveState::TranscodeSubmitFailed(_)
        )
    }

    /// State an external retry enters the chain at.
    fn resume_point(step: ArchiveStep) -> Self {
        match step {
            ArchiveStep::Copy => ArchiveState::Start,
            ArchiveStep::Delete => ArchiveState::CopySucceeded,
            ArchiveStep::Transcode => ArchiveState::DeleteSucceeded,
        }
    }
}

/// What an archival run did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReport {
    pub job: VideoJobDescriptor,
    pub state: ArchiveState,
    /// Steps that completed in this run, in order.
    pub completed: Vec<ArchiveStep>,
    pub remote_job_id: Option<String>,
}

impl ArchiveReport {
    /// A preview output was part of an accepted transcode job.
    pub fn preview_requested(&self) -> bool {
        self.state == ArchiveState::TranscodeSubmitted && self.job.transcode.preview.is_some()
    }

    pub fn into_terminal(self) -> TerminalResult {
        let job_id = &self.job.job_id;
        let source = format!(
            "s3://{}/{}",
            self.job.source_copy.source_bucket, self.job.source_copy.source_key
        );
        let archive = format!(
            "s3://{}/{}",
            self.job.source_copy.target_bucket, self.job.source_copy.target_key
        );

        match self.state {
            ArchiveState::TranscodeSubmitted => TerminalResult::success(VIDEO_ARCHIVED_MSG),
            ArchiveState::CopyFailed(e) => TerminalResult::failure(
                FailureKind::CopyError,
                format!(
                    "Error copying {} to {} (job {}): {}",
                    source, archive, job_id, e
                ),
            ),
            ArchiveState::DeleteFailed(e) => TerminalResult::failure(
                FailureKind::DeleteError,
                format!(
                    "Video copied to {} but original {} was not deleted (job {}): {}",
                    archive, source, job_id, e
                ),
            ),
            ArchiveState::TranscodeSubmitFailed(e) => TerminalResult::failure(
                FailureKind::TranscodeSubmitError,
                format!(
                    "Video archived to {} but transcode job {} was not submitted: {}",
                    archive, job_id, e
                ),
            ),
            state => TerminalResult::failure(
                FailureKind::ProcessingError,
                format!("Video archival for job {} stopped in state {:?}", job_id, state),
            ),
        }
    }
}

/// Orchestrates copy → delete → transcode submission for one uploaded video.
pub struct VideoArchiver {
    storage: Arc<dyn ObjectStorage>,
    transcoder: Arc<dyn TranscodeService>,
}

impl VideoArchiver {
    pub fn new(storage: Arc<dyn ObjectStorage>, transcoder: Arc<dyn TranscodeService>) -> Self {
        Self {
            storage,
            transcoder,
        }
    }

    /// Archive a fresh upload under a newly generated job id.
    pub async fn archive(&self, record: &UploadRecord, config: &Config) -> TerminalResult {
        self.run(record, config).await.into_terminal()
    }

    /// Like [`archive`](Self::archive), returning the full report.
    pub async fn run(&self, record: &UploadRecord, config: &Config) -> ArchiveReport {
        let job = VideoJobDescriptor::new(record, config);
        self.drive(job, ArchiveState::Start).await
    }

    /// Re-enter the chain at `from`, reusing the job id of an earlier attempt.
    ///
    /// Resuming at `Delete` or `Transcode` first confirms the archival copy exists.
    pub async fn resume(
        &self,
        record: &UploadRecord,
        config: &Config,
        job_id: &str,
        from: ArchiveStep,
    ) -> Result<ArchiveReport> {
        if !VideoJobDescriptor::is_valid_job_id(job_id) {
            bail!("Invalid job id: {}", job_id);
        }
        let job = VideoJobDescriptor::with_id(record, config, job_id.to_string());

        tracing::info!(job_id = %job_id, from = %from, "Resuming video archival");

        let state = match from {
            ArchiveStep::Copy => ArchiveState::Start,
            step => match self.verify_archival_copy(&job).await {
                Ok(()) => ArchiveState::resume_point(step),
                Err(e) => ArchiveState::CopyFailed(e),
            },
        };

        Ok(self.drive(job, state).await)
    }

    async fn verify_archival_copy(&self, job: &VideoJobDescriptor) -> Result<(), String> {
        let copy = &job.source_copy;
        match self.storage.exists(&copy.target_bucket, &copy.target_key).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(format!(
                "archival copy {} not found, resume from copy",
                copy.target_key
            )),
            Err(e) => Err(format!("could not confirm archival copy: {}", e)),
        }
    }

    async fn drive(&self, job: VideoJobDescriptor, mut state: ArchiveState) -> ArchiveReport {
        let start = Instant::now();
        let mut report = ArchiveReport {
            job,
            state: ArchiveState::Start,
            completed: Vec::new(),
            remote_job_id: None,
        };

        while !state.is_terminal() {
            state = self.advance(state, &mut report).await;
        }
        report.state = state;

        match &report.state {
            ArchiveState::TranscodeSubmitted => tracing::info!(
                job_id = %report.job.job_id,
                archival_key = %report.job.archival_key(),
                preview = report.preview_requested(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Video archived and transcode job submitted"
            ),
            ArchiveState::CopyFailed(e) => tracing::error!(
                job_id = %report.job.job_id,
                error = %e,
                "Video archival failed, original left in place"
            ),
            state => tracing::warn!(
                job_id = %report.job.job_id,
                state = ?state,
                completed = ?report.completed,
                "Video archival partially completed"
            ),
        }

        report
    }

    /// One transition. Remote calls are awaited here, never spawned.
    async fn advance(&self, state: ArchiveState, report: &mut ArchiveReport) -> ArchiveState {
        let job = &report.job;
        match state {
            ArchiveState::Start => {
                tracing::info!(
                    job_id = %job.job_id,
                    source_bucket = %job.source_copy.source_bucket,
                    source_key = %job.source_copy.source_key,
                    target_key = %job.source_copy.target_key,
                    "Processing video"
                );
                ArchiveState::CopyInFlight
            }
            ArchiveState::CopyInFlight => match self.storage.copy(&job.source_copy).await {
                Ok(()) => {
                    report.completed.push(ArchiveStep::Copy);
                    ArchiveState::CopySucceeded
                }
                Err(e) => ArchiveState::CopyFailed(e.to_string()),
            },
            ArchiveState::CopySucceeded => ArchiveState::DeleteInFlight,
            ArchiveState::DeleteInFlight => {
                let source = &job.source_copy;
                match self
                    .storage
                    .delete(&source.source_bucket, &source.source_key)
                    .await
                {
                    Ok(()) => {
                        report.completed.push(ArchiveStep::Delete);
                        ArchiveState::DeleteSucceeded
                    }
                    Err(e) => ArchiveState::DeleteFailed(e.to_string()),
                }
            }
            ArchiveState::DeleteSucceeded => {
                match self.transcoder.submit_job(&job.transcode).await {
                    Ok(submitted) => {
                        report.completed.push(ArchiveStep::Transcode);
                        report.remote_job_id = submitted.remote_id;
                        ArchiveState::TranscodeSubmitted
                    }
                    Err(e) => ArchiveState::TranscodeSubmitFailed(e.to_string()),
                }
            }
            terminal => terminal,
        }
    }
}
