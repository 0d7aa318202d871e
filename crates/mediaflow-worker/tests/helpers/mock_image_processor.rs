//! Scripted image processor

use async_trait::async_trait;
use mediaflow_core::{Config, UploadRecord};
use mediaflow_processing::{ImageProcessingError, ImageProcessor};
use mediaflow_storage::StorageError;
use std::sync::Mutex;

use super::{Call, CallLog};

/// What the next `run` returns
#[derive(Debug, Clone)]
pub enum ImageBehavior {
    Produce(usize),
    AlreadyProcessed,
    EmptyOrBroken,
    Fail(String),
}

pub struct MockImageProcessor {
    calls: CallLog,
    behavior: Mutex<ImageBehavior>,
}

impl MockImageProcessor {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            behavior: Mutex::new(ImageBehavior::Produce(0)),
        }
    }

    pub fn set_behavior(&self, behavior: ImageBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl ImageProcessor for MockImageProcessor {
    async fn run(
        &self,
        record: &UploadRecord,
        _config: &Config,
    ) -> Result<usize, ImageProcessingError> {
        self.calls.record(Call::RunImage {
            bucket: record.bucket_name().to_string(),
            key: record.object_key().to_string(),
        });

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            ImageBehavior::Produce(count) => Ok(count),
            ImageBehavior::AlreadyProcessed => Err(ImageProcessingError::AlreadyProcessed),
            ImageBehavior::EmptyOrBroken => Err(ImageProcessingError::EmptyOrBroken),
            ImageBehavior::Fail(reason) => {
                Err(ImageProcessingError::Storage(StorageError::DownloadFailed(reason)))
            }
        }
    }
}
