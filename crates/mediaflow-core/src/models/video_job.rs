use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, Dimensions, VariantFormat};
use crate::models::UploadRecord;

/// Steps of the video archival chain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStep {
    Copy,
    Delete,
    Transcode,
}

impl Display for ArchiveStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ArchiveStep::Copy => write!(f, "copy"),
            ArchiveStep::Delete => write!(f, "delete"),
            ArchiveStep::Transcode => write!(f, "transcode"),
        }
    }
}

impl FromStr for ArchiveStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "copy" => Ok(ArchiveStep::Copy),
            "delete" => Ok(ArchiveStep::Delete),
            "transcode" => Ok(ArchiveStep::Transcode),
            _ => Err(anyhow::anyhow!("Invalid archive step: {}", s)),
        }
    }
}

/// Server-side copy of the original into the archival location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySpec {
    pub source_bucket: String,
    pub source_key: String,
    pub target_bucket: String,
    pub target_key: String,
}

/// Still image the transcode service renders next to its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSpec {
    pub bucket: String,
    pub key: String,
    pub format: VariantFormat,
    pub dimensions: Dimensions,
}

/// Transcode job submission. Same id, same inputs: resubmitting is safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeSpec {
    pub job_id: String,
    pub input_bucket: String,
    pub input_key: String,
    pub destination_bucket: String,
    pub destination_key_prefix: String,
    pub job_template: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewSpec>,
}

impl TranscodeSpec {
    pub fn input_uri(&self) -> String {
        format!("s3://{}/{}", self.input_bucket, self.input_key)
    }

    pub fn destination_uri(&self) -> String {
        format!(
            "s3://{}/{}",
            self.destination_bucket, self.destination_key_prefix
        )
    }
}

/// Everything the video chain needs, derived once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobDescriptor {
    pub job_id: String,
    pub source_copy: CopySpec,
    pub preview: Option<PreviewSpec>,
    pub transcode: TranscodeSpec,
}

impl VideoJobDescriptor {
    /// 128-bit random identifier, hex encoded.
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Identifiers end up in object keys; only `[A-Za-z0-9_-]` is accepted.
    pub fn is_valid_job_id(job_id: &str) -> bool {
        !job_id.is_empty()
            && job_id.len() <= 64
            && job_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Descriptor with a freshly generated id.
    pub fn new(record: &UploadRecord, config: &Config) -> Self {
        Self::with_id(record, config, Self::generate_id())
    }

    /// Descriptor reusing an id from a previous attempt.
    pub fn with_id(record: &UploadRecord, config: &Config, job_id: String) -> Self {
        let target_bucket = config.target_bucket().to_string();
        let dir = config.archival_directory();

        let archival_key = match record.extension() {
            Some(ext) => format!("{}{}.{}", dir, job_id, ext),
            None => format!("{}{}", dir, job_id),
        };

        let preview = config
            .stack
            .backup
            .preview
            .then(|| config.resizes().first())
            .flatten()
            .map(|resize| PreviewSpec {
                bucket: target_bucket.clone(),
                key: format!(
                    "{}{}{}.{}",
                    dir,
                    resize.prefix,
                    job_id,
                    resize.format.extension()
                ),
                format: resize.format,
                dimensions: resize.dimensions,
            });

        let transcode = TranscodeSpec {
            job_id: job_id.clone(),
            input_bucket: target_bucket.clone(),
            input_key: archival_key.clone(),
            destination_bucket: target_bucket.clone(),
            destination_key_prefix: format!("{}{}", config.transcode.destination_prefix, job_id),
            job_template: config.transcode.job_template.clone(),
            role: config.transcode.role.clone(),
            queue: config.transcode.queue.clone(),
            preview: preview.clone(),
        };

        Self {
            job_id,
            source_copy: CopySpec {
                source_bucket: record.bucket_name().to_string(),
                source_key: record.object_key().to_string(),
                target_bucket,
                target_key: archival_key,
            },
            preview,
            transcode,
        }
    }

    pub fn archival_key(&self) -> &str {
        &self.source_copy.target_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(preview: bool) -> Config {
        Config::from_json(&format!(
            r#"{{
                "stack": {{
                    "bucket": "archive",
                    "resizes": [{{ "prefix": "thumb_", "format": "png", "dimensions": "320x180" }}],
                    "backup": {{ "directory": "videos/", "preview": {} }}
                }},
                "transcode": {{
                    "jobTemplate": "hls-template",
                    "role": "arn:aws:iam::1:role/mc",
                    "destinationPrefix": "transcoded/",
                    "queue": "default"
                }}
            }}"#,
            preview
        ))
        .unwrap()
    }

    #[test]
    fn test_descriptor_keys() {
        let record = UploadRecord::new("uploads", "in/clip.MOV").unwrap();
        let job = VideoJobDescriptor::with_id(&record, &config(true), "abc123".to_string());

        assert_eq!(job.archival_key(), "videos/abc123.MOV");
        assert_eq!(job.source_copy.source_bucket, "uploads");
        assert_eq!(job.source_copy.source_key, "in/clip.MOV");
        assert_eq!(job.source_copy.target_bucket, "archive");
        assert_eq!(job.transcode.input_uri(), "s3://archive/videos/abc123.MOV");
        assert_eq!(job.transcode.destination_uri(), "s3://archive/transcoded/abc123");
        assert_eq!(job.transcode.queue.as_deref(), Some("default"));

        let preview = job.preview.expect("preview requested");
        assert_eq!(preview.key, "videos/thumb_abc123.png");
        assert_eq!(job.transcode.preview.as_ref(), Some(&preview));
    }

    #[test]
    fn test_preview_disabled() {
        let record = UploadRecord::new("uploads", "clip.mp4").unwrap();
        let job = VideoJobDescriptor::new(&record, &config(false));
        assert!(job.preview.is_none());
        assert!(job.transcode.preview.is_none());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = VideoJobDescriptor::generate_id();
        let b = VideoJobDescriptor::generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(VideoJobDescriptor::is_valid_job_id(&a));
    }

    #[test]
    fn test_job_id_validation() {
        assert!(VideoJobDescriptor::is_valid_job_id("retry-01_a"));
        assert!(!VideoJobDescriptor::is_valid_job_id(""));
        assert!(!VideoJobDescriptor::is_valid_job_id("../etc"));
        assert!(!VideoJobDescriptor::is_valid_job_id("a/b"));
    }

    #[test]
    fn test_archive_step_parse_and_order() {
        assert_eq!("Delete".parse::<ArchiveStep>().unwrap(), ArchiveStep::Delete);
        assert!("rollback".parse::<ArchiveStep>().is_err());
        assert!(ArchiveStep::Copy < ArchiveStep::Delete);
        assert!(ArchiveStep::Delete < ArchiveStep::Transcode);
    }
}
