//! Shared fixtures for dispatcher tests
//!
//! All mocks append to one [`CallLog`] so tests can assert call counts and the
//! relative order of storage and transcode calls.

#![allow(dead_code)]

pub mod mock_image_processor;
pub mod mock_storage;
pub mod mock_transcoder;

pub use mock_image_processor::{ImageBehavior, MockImageProcessor};
pub use mock_storage::MockStorage;
pub use mock_transcoder::MockTranscoder;

use mediaflow_core::{Config, CopySpec, TranscodeSpec};
use mediaflow_worker::{Dispatcher, HandlerContext};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get { bucket: String, key: String },
    Put { bucket: String, key: String },
    Copy(CopySpec),
    Delete { bucket: String, key: String },
    Exists { bucket: String, key: String },
    SubmitJob(TranscodeSpec),
    RunImage { bucket: String, key: String },
}

impl Call {
    /// Whether this call touches `bucket/key`, as source or destination.
    pub fn references(&self, bucket: &str, key: &str) -> bool {
        match self {
            Call::Get { bucket: b, key: k }
            | Call::Put { bucket: b, key: k }
            | Call::Delete { bucket: b, key: k }
            | Call::Exists { bucket: b, key: k }
            | Call::RunImage { bucket: b, key: k } => b == bucket && k == key,
            Call::Copy(spec) => {
                (spec.source_bucket == bucket && spec.source_key == key)
                    || (spec.target_bucket == bucket && spec.target_key == key)
            }
            Call::SubmitJob(spec) => spec.input_bucket == bucket && spec.input_key == key,
        }
    }
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn copies(&self) -> usize {
        self.count(|c| matches!(c, Call::Copy(_)))
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, Call::Delete { .. }))
    }

    pub fn submissions(&self) -> Vec<TranscodeSpec> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SubmitJob(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }
}

pub const CONFIG_JSON: &str = r#"{
    "stack": {
        "bucket": "media-out",
        "resizes": [
            { "prefix": "thumb/", "format": "jpeg", "dimensions": "150x150" },
            { "prefix": "large/", "format": "webp", "dimensions": "1280x720" }
        ],
        "backup": { "directory": "videos/" }
    },
    "transcode": {
        "jobTemplate": "hls-template",
        "role": "arn:aws:iam::123456789012:role/MediaConvert",
        "destinationPrefix": "transcoded/"
    }
}"#;

pub fn test_config() -> Config {
    Config::from_json(CONFIG_JSON).unwrap()
}

/// Minimal S3 put notification
pub fn s3_event(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key, "size": 1024 }
            }
        }]
    })
}

pub struct TestHarness {
    pub calls: CallLog,
    pub storage: Arc<MockStorage>,
    pub images: Arc<MockImageProcessor>,
    pub transcoder: Arc<MockTranscoder>,
    pub dispatcher: Dispatcher,
}

pub fn setup() -> TestHarness {
    setup_with_config(test_config())
}

pub fn setup_with_config(config: impl Into<mediaflow_worker::ConfigSource>) -> TestHarness {
    let calls = CallLog::default();
    let storage = Arc::new(MockStorage::new(calls.clone()));
    let images = Arc::new(MockImageProcessor::new(calls.clone()));
    let transcoder = Arc::new(MockTranscoder::new(calls.clone()));

    let context = HandlerContext::new(storage.clone(), images.clone(), transcoder.clone());
    let dispatcher = Dispatcher::new(context, config);

    TestHarness {
        calls,
        storage,
        images,
        transcoder,
        dispatcher,
    }
}
