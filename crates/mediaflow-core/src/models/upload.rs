use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::EventError;

/// Canonical form of an upload notification: which object was written where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    bucket_name: String,
    object_key: String,
}

impl UploadRecord {
    pub fn new(
        bucket_name: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Result<Self, EventError> {
        let bucket_name = bucket_name.into();
        let object_key = object_key.into();

        if bucket_name.is_empty() {
            return Err(EventError::EmptyField("bucket name"));
        }
        if object_key.is_empty() {
            return Err(EventError::EmptyField("object key"));
        }

        Ok(Self {
            bucket_name,
            object_key,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    /// Final path segment of the key.
    pub fn file_name(&self) -> &str {
        self.object_key
            .rsplit('/')
            .next()
            .unwrap_or(&self.object_key)
    }

    /// Extension of the final path segment, case preserved.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match self.extension() {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        }
    }

    /// Key without its extension (directories kept).
    pub fn key_stem(&self) -> &str {
        match self.extension() {
            Some(ext) => &self.object_key[..self.object_key.len() - ext.len() - 1],
            None => &self.object_key,
        }
    }

    /// True for keys naming a "folder" placeholder object.
    pub fn is_directory(&self) -> bool {
        self.object_key.ends_with('/')
    }

    /// Pipeline selected by the lowercased extension of the final path segment.
    pub fn media_kind(&self, config: &Config) -> MediaKind {
        match self.extension() {
            Some(ext) if config.is_video_extension(ext) => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

impl Display for UploadRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "s3://{}/{}", self.bucket_name, self.object_key)
    }
}

/// Pipeline an upload is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_json(
            r#"{
                "stack": {
                    "bucket": "out",
                    "resizes": [{ "prefix": "thumb/", "format": "jpeg", "dimensions": 100 }],
                    "backup": { "directory": "videos/" }
                },
                "transcode": { "jobTemplate": "t", "role": "r", "destinationPrefix": "hls/" }
            }"#,
        )
        .unwrap()
    }

    fn record(key: &str) -> UploadRecord {
        UploadRecord::new("b", key).unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            UploadRecord::new("b", ""),
            Err(EventError::EmptyField("object key"))
        ));
        assert!(UploadRecord::new("", "a.jpg").is_err());
    }

    #[test]
    fn test_extension_uses_final_segment() {
        assert_eq!(record("img/photo.JPG").extension(), Some("JPG"));
        assert_eq!(record("clips.mp4/readme").extension(), None);
        assert_eq!(record("archive.tar.gz").extension(), Some("gz"));
        assert_eq!(record("trailing.").extension(), None);
        assert_eq!(record("folder/").extension(), None);
    }

    #[test]
    fn test_stems() {
        let r = record("img/summer/photo.JPG");
        assert_eq!(r.file_name(), "photo.JPG");
        assert_eq!(r.file_stem(), "photo");
        assert_eq!(r.key_stem(), "img/summer/photo");
        assert_eq!(record("noext").key_stem(), "noext");
    }

    #[test]
    fn test_video_routing_is_case_insensitive() {
        let config = config();
        for key in ["clip.mp4", "clip.MP4", "a/b/clip.mov", "clip.MoV"] {
            assert_eq!(record(key).media_kind(&config), MediaKind::Video, "{}", key);
        }
    }

    #[test]
    fn test_everything_else_is_image() {
        let config = config();
        for key in [
            "img/photo.JPG",
            "photo.png",
            "photo.webp",
            "photo.gif",
            "mp4",
            "clip.mp4.jpg",
            "movies.mov/poster",
            "folder/",
        ] {
            assert_eq!(record(key).media_kind(&config), MediaKind::Image, "{}", key);
        }
    }
}
