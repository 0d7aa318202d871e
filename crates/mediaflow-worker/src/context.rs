//! Collaborators and settings handed to the dispatcher
//!
//! The dispatcher never constructs its own clients. Production wiring goes
//! through [`HandlerContext::from_env`]; tests inject recording mocks.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use mediaflow_core::{Config, ConfigError};
use mediaflow_processing::{ImageProcessor, TranscodeService, VariantProcessor, VideoArchiver};
use mediaflow_services::create_transcoder;
use mediaflow_storage::{create_storage, ObjectStorage, StorageSettings};

/// External collaborators used by the pipelines.
#[derive(Clone)]
pub struct HandlerContext {
    pub storage: Arc<dyn ObjectStorage>,
    pub image_processor: Arc<dyn ImageProcessor>,
    pub transcoder: Arc<dyn TranscodeService>,
}

impl HandlerContext {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        image_processor: Arc<dyn ImageProcessor>,
        transcoder: Arc<dyn TranscodeService>,
    ) -> Self {
        Self {
            storage,
            image_processor,
            transcoder,
        }
    }

    /// Storage from `MEDIAFLOW_STORAGE` and friends, the variant processor over
    /// that storage, and the transcode backend named by `transcode.backend`.
    pub async fn from_env(config: &Config) -> Result<Self> {
        let settings = StorageSettings::from_env().context("Invalid storage settings")?;
        let storage = create_storage(&settings)
            .await
            .context("Failed to initialize object storage")?;
        let transcoder = create_transcoder(&config.transcode)
            .await
            .context("Failed to initialize transcode backend")?;

        tracing::info!(
            storage_backend = %settings.backend,
            transcode_backend = %transcoder.backend(),
            "Handler context initialized"
        );

        let image_processor = Arc::new(VariantProcessor::new(storage.clone()));
        Ok(Self::new(storage, image_processor, transcoder))
    }

    pub fn video_archiver(&self) -> VideoArchiver {
        VideoArchiver::new(self.storage.clone(), self.transcoder.clone())
    }
}

/// Where the dispatcher gets its settings for an invocation.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    /// Loaded and validated once at start-up.
    Static(Arc<Config>),
    /// Read and validated on every invocation.
    File(PathBuf),
}

impl ConfigSource {
    pub fn load(&self) -> Result<Arc<Config>, ConfigError> {
        match self {
            ConfigSource::Static(config) => Ok(config.clone()),
            ConfigSource::File(path) => Config::load(path).map(Arc::new),
        }
    }
}

impl From<Config> for ConfigSource {
    fn from(config: Config) -> Self {
        ConfigSource::Static(Arc::new(config))
    }
}

impl From<Arc<Config>> for ConfigSource {
    fn from(config: Arc<Config>) -> Self {
        ConfigSource::Static(config)
    }
}
