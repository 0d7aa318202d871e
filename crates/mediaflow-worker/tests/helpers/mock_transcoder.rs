//! Transcode service recording every submission

use async_trait::async_trait;
use mediaflow_core::{TranscodeBackend, TranscodeSpec};
use mediaflow_processing::{SubmittedJob, TranscodeError, TranscodeService};
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Call, CallLog};

pub struct MockTranscoder {
    calls: CallLog,
    fail: AtomicBool,
}

impl MockTranscoder {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_submissions(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TranscodeService for MockTranscoder {
    async fn submit_job(&self, spec: &TranscodeSpec) -> Result<SubmittedJob, TranscodeError> {
        self.calls.record(Call::SubmitJob(spec.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(TranscodeError::Unavailable("connection reset".to_string()));
        }
        Ok(SubmittedJob {
            remote_id: Some(format!("mc-{}", spec.job_id)),
        })
    }

    fn backend(&self) -> TranscodeBackend {
        TranscodeBackend::MediaConvert
    }
}
