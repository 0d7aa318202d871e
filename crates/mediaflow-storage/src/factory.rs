#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use std::env;
use std::sync::Arc;

/// Storage backend settings, read from the environment
#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_root: Option<String>,
}

impl StorageSettings {
    /// `MEDIAFLOW_STORAGE` (s3|local, default s3), `AWS_REGION`,
    /// `MEDIAFLOW_S3_ENDPOINT`, `MEDIAFLOW_LOCAL_ROOT`.
    pub fn from_env() -> StorageResult<Self> {
        let backend = match env::var("MEDIAFLOW_STORAGE") {
            Ok(value) => value
                .parse()
                .map_err(|e: anyhow::Error| StorageError::ConfigError(e.to_string()))?,
            Err(_) => StorageBackend::S3,
        };

        Ok(Self {
            backend,
            region: env::var("AWS_REGION").ok(),
            s3_endpoint: env::var("MEDIAFLOW_S3_ENDPOINT").ok(),
            local_root: env::var("MEDIAFLOW_LOCAL_ROOT").ok(),
        })
    }
}

/// Create a storage backend based on configuration
pub async fn create_storage(settings: &StorageSettings) -> StorageResult<Arc<dyn ObjectStorage>> {
    match settings.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::new(settings.region.clone(), settings.s3_endpoint.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let root = settings.local_root.clone().ok_or_else(|| {
                StorageError::ConfigError("MEDIAFLOW_LOCAL_ROOT not configured".to_string())
            })?;

            let storage = LocalStorage::new(root).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
