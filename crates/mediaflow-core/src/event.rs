//! Upload notification parsing
//!
//! Normalizes the notification envelopes the object store can deliver into an
//! [`UploadRecord`]:
//!
//! - S3 event: `Records[0].s3.bucket.name` / `Records[0].s3.object.key`
//! - S3 event delivered through SNS: `Records[0].Sns.Message` holds the S3 event as a string
//! - EventBridge "Object Created": `detail.bucket.name` / `detail.object.key`
//!
//! Only the first record is used; one invocation handles one upload.

use serde::Deserialize;
use serde_json::Value;

use crate::error::EventError;
use crate::models::UploadRecord;

const SUMMARY_MAX_CHARS: usize = 256;

#[derive(Debug, Deserialize)]
struct NotificationEvent {
    #[serde(rename = "Records", default)]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    #[serde(rename = "eventName")]
    event_name: Option<String>,
    s3: Option<S3Entity>,
    #[serde(rename = "Sns")]
    sns: Option<SnsEntity>,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: Option<S3Bucket>,
    object: Option<S3Object>,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnsEntity {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct EventBridgeEvent {
    #[serde(rename = "detail-type")]
    detail_type: String,
    detail: S3Entity,
}

/// S3 event name prefix of every creation notification (`ObjectCreated:Put`, ...)
const S3_CREATED_PREFIX: &str = "ObjectCreated:";
/// EventBridge detail type of a creation notification
const EVENTBRIDGE_CREATED: &str = "Object Created";

/// Parse a raw notification payload into an [`UploadRecord`].
pub fn parse_event(raw: &Value) -> Result<UploadRecord, EventError> {
    let object = raw.as_object().ok_or(EventError::NotAnObject)?;

    if object.contains_key("Records") {
        return parse_records(raw, true);
    }

    if object.contains_key("detail") && object.contains_key("detail-type") {
        let event = EventBridgeEvent::deserialize(raw).map_err(|_| EventError::UnrecognizedShape)?;
        if event.detail_type != EVENTBRIDGE_CREATED {
            return Err(EventError::NotAnUpload(event.detail_type));
        }
        return record_from_entity(event.detail);
    }

    Err(EventError::UnrecognizedShape)
}

fn parse_records(raw: &Value, allow_sns: bool) -> Result<UploadRecord, EventError> {
    let event = NotificationEvent::deserialize(raw).map_err(|_| EventError::UnrecognizedShape)?;
    let record = event.records.into_iter().next().ok_or(EventError::NoRecords)?;

    // Removal notifications (including the archiver's own delete) are not uploads
    if let Some(name) = record.event_name {
        if !name.starts_with(S3_CREATED_PREFIX) {
            return Err(EventError::NotAnUpload(name));
        }
    }

    match (record.s3, record.sns) {
        (Some(entity), _) => record_from_entity(entity),
        (None, Some(sns)) if allow_sns => {
            let inner: Value = serde_json::from_str(&sns.message)
                .map_err(|e| EventError::InvalidSnsMessage(e.to_string()))?;
            if !inner.is_object() {
                return Err(EventError::InvalidSnsMessage(
                    "message is not a JSON object".to_string(),
                ));
            }
            parse_records(&inner, false)
        }
        _ => Err(EventError::UnrecognizedShape),
    }
}

fn record_from_entity(entity: S3Entity) -> Result<UploadRecord, EventError> {
    let bucket = entity
        .bucket
        .and_then(|b| b.name)
        .ok_or(EventError::MissingField("bucket name"))?;
    let key = entity
        .object
        .and_then(|o| o.key)
        .ok_or(EventError::MissingField("object key"))?;

    UploadRecord::new(bucket, decode_key(&key)?)
}

/// Notification keys are URL-encoded with `+` standing for a space.
fn decode_key(key: &str) -> Result<String, EventError> {
    let spaced = key.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|k| k.into_owned())
        .map_err(|e| EventError::InvalidKey(e.to_string()))
}

/// Bounded one-line rendering of a payload for logs and failure details.
pub fn summarize(raw: &Value) -> String {
    let rendered = raw.to_string();
    if rendered.chars().count() <= SUMMARY_MAX_CHARS {
        return rendered;
    }
    let truncated: String = rendered.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{}...", truncated)
}
