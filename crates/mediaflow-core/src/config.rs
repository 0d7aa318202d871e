//! Configuration module
//!
//! The settings document is a static JSON file describing the target bucket, the
//! image variants to generate, where archived videos go and how transcode jobs are
//! submitted. It is loaded and validated once, then shared read-only.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the settings document.
pub const CONFIG_PATH_ENV: &str = "MEDIAFLOW_CONFIG";
/// Settings document used when `MEDIAFLOW_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_video_extensions() -> Vec<String> {
    vec!["mp4".to_string(), "mov".to_string()]
}

fn default_true() -> bool {
    true
}

/// Root of the settings document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub stack: StackConfig,
    pub transcode: TranscodeConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Bucket receiving variants and archived videos.
    pub bucket: String,
    #[serde(default)]
    pub resizes: Vec<ResizeDefinition>,
    pub backup: BackupConfig,
    /// Lowercase extensions routed to the video pipeline.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfig {
    /// Archival directory; keys are `{directory}{id}.{ext}`.
    pub directory: String,
    /// Ask the transcode service for a preview frame alongside the job output.
    #[serde(default = "default_true")]
    pub preview: bool,
}

/// One image variant to generate.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResizeDefinition {
    pub prefix: String,
    pub format: VariantFormat,
    pub dimensions: Dimensions,
    /// Lossy encoding preset; only JPEG variants use it.
    #[serde(default)]
    pub quality: QualityPreset,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeConfig {
    #[serde(default)]
    pub backend: TranscodeBackend,
    #[serde(default)]
    pub job_template: String,
    #[serde(default)]
    pub role: String,
    pub destination_prefix: String,
    /// Account-specific MediaConvert endpoint, or the URL of the HTTP backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
}

/// Transcode backend selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscodeBackend {
    #[default]
    MediaConvert,
    Http,
}

impl Display for TranscodeBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TranscodeBackend::MediaConvert => write!(f, "mediaconvert"),
            TranscodeBackend::Http => write!(f, "http"),
        }
    }
}

/// Output encoding of an image variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
    Gif,
}

impl VariantFormat {
    /// File extension used for keys written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            VariantFormat::Jpeg => "jpg",
            VariantFormat::Png => "png",
            VariantFormat::WebP => "webp",
            VariantFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            VariantFormat::Jpeg => "image/jpeg",
            VariantFormat::Png => "image/png",
            VariantFormat::WebP => "image/webp",
            VariantFormat::Gif => "image/gif",
        }
    }
}

/// Quality presets for lossy variant encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    Normal, // Default quality, balanced size and quality
    Better,   // Higher quality, larger files
    Best,     // Near pristine quality
    Lighter,  // Smaller files
    Lightest, // Maximum compression
}

impl QualityPreset {
    /// JPEG quality (1-100)
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Normal => 75,
            QualityPreset::Better => 85,
            QualityPreset::Best => 95,
            QualityPreset::Lighter => 65,
            QualityPreset::Lightest => 50,
        }
    }
}

/// Bounding box for a variant. `"300"` or `300` is a 300x300 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimensions {
    Number(u32),
    Text(String),
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = String;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        match raw {
            RawDimensions::Number(side) => Dimensions::square(side),
            RawDimensions::Text(s) => s.parse(),
        }
    }
}

impl Dimensions {
    fn square(side: u32) -> Result<Self, String> {
        if side == 0 {
            return Err("dimensions must be positive".to_string());
        }
        Ok(Dimensions {
            width: side,
            height: side,
        })
    }
}

impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid dimensions: {}", s))
        };

        match s.split_once(|c: char| c == 'x' || c == 'X') {
            Some((w, h)) => {
                let (width, height) = (parse(w)?, parse(h)?);
                if width == 0 || height == 0 {
                    return Err("dimensions must be positive".to_string());
                }
                Ok(Dimensions { width, height })
            }
            None => Dimensions::square(parse(s)?),
        }
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Config {
    /// Parse and validate a settings document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the settings document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;

        tracing::debug!(
            path = %path.display(),
            resizes = config.stack.resizes.len(),
            transcode_backend = %config.transcode.backend,
            "Config loaded"
        );

        Ok(config)
    }

    /// Load the document named by `MEDIAFLOW_CONFIG` (default `config.json`).
    /// A `.env` file is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("stack.bucket"));
        }

        let dir = &self.stack.backup.directory;
        if !dir.is_empty() && !dir.ends_with('/') {
            return Err(ConfigError::invalid(
                "stack.backup.directory",
                format!("'{}' must end with '/'", dir),
            ));
        }
        if dir.starts_with('/') {
            return Err(ConfigError::invalid(
                "stack.backup.directory",
                "must not start with '/'",
            ));
        }

        if self.stack.video_extensions.is_empty() {
            return Err(ConfigError::invalid(
                "stack.videoExtensions",
                "at least one extension is required",
            ));
        }
        if let Some(ext) = self
            .stack
            .video_extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.') || e.to_lowercase() != **e)
        {
            return Err(ConfigError::invalid(
                "stack.videoExtensions",
                format!("'{}' must be a lowercase extension without a dot", ext),
            ));
        }

        if self.stack.resizes.is_empty() {
            return Err(ConfigError::invalid(
                "stack.resizes",
                "at least one resize definition is required",
            ));
        }

        if self.transcode.destination_prefix.is_empty() {
            return Err(ConfigError::Missing("transcode.destinationPrefix"));
        }

        match self.transcode.backend {
            TranscodeBackend::MediaConvert => {
                if self.transcode.job_template.is_empty() {
                    return Err(ConfigError::Missing("transcode.jobTemplate"));
                }
                if self.transcode.role.is_empty() {
                    return Err(ConfigError::Missing("transcode.role"));
                }
            }
            TranscodeBackend::Http => {
                if self.transcode.endpoint.as_deref().unwrap_or("").is_empty() {
                    return Err(ConfigError::Missing("transcode.endpoint"));
                }
            }
        }

        Ok(())
    }

    pub fn target_bucket(&self) -> &str {
        &self.stack.bucket
    }

    pub fn resizes(&self) -> &[ResizeDefinition] {
        &self.stack.resizes
    }

    pub fn archival_directory(&self) -> &str {
        &self.stack.backup.directory
    }

    /// Case-insensitive check against `stack.videoExtensions`.
    pub fn is_video_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.stack.video_extensions.iter().any(|e| *e == extension)
    }
}
