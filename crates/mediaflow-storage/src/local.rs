use crate::traits::{ObjectStorage, StorageBackend, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use mediaflow_core::CopySpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Directory under the root holding content type and user metadata sidecars.
const META_DIR: &str = ".meta";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    content_type: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// Local filesystem storage implementation
///
/// Each bucket is a directory under `base_path`; keys are relative paths inside it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding one directory per bucket
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate a bucket name or key so it cannot escape the storage root
    fn check_relative(value: &str, what: &str) -> StorageResult<()> {
        if value.is_empty() || value.starts_with('/') {
            return Err(StorageError::InvalidKey(format!(
                "{} must be a non-empty relative path",
                what
            )));
        }
        let escapes = Path::new(value)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidKey(format!(
                "{} contains invalid path components",
                what
            )));
        }
        Ok(())
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        Self::check_relative(bucket, "Bucket")?;
        // Only a bucket can land on the sidecar directory
        if Path::new(bucket).components().next() == Some(Component::Normal(META_DIR.as_ref())) {
            return Err(StorageError::InvalidKey(format!(
                "Bucket '{}' is reserved",
                bucket
            )));
        }
        Self::check_relative(key.trim_end_matches('/'), "Storage key")?;
        Ok(self.base_path.join(bucket).join(key))
    }

    fn sidecar_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.base_path
            .join(META_DIR)
            .join(bucket)
            .join(format!("{}.json", key))
    }

    async fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn read_sidecar(&self, bucket: &str, key: &str) -> StorageResult<Sidecar> {
        match fs::read(self.sidecar_path(bucket, key)).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| StorageError::BackendError(format!("Corrupt metadata: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Sidecar::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_sidecar(&self, bucket: &str, key: &str, sidecar: &Sidecar) -> StorageResult<()> {
        let path = self.sidecar_path(bucket, key);
        Self::ensure_parent_dir(&path).await?;
        let raw = serde_json::to_vec(sidecar)
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        fs::write(path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let path = self.object_path(bucket, key)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("{}/{}", bucket, key)));
            }
            // A "folder" key resolves to a directory; it reads as an empty object.
            Err(_) if path.is_dir() => Vec::new(),
            Err(e) => return Err(StorageError::DownloadFailed(e.to_string())),
        };

        let sidecar = self.read_sidecar(bucket, key).await?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len() as u64,
            "Local download successful"
        );

        Ok(StoredObject {
            data: Bytes::from(data),
            content_type: sidecar.content_type,
            metadata: sidecar.metadata,
        })
    }

    async fn put(&self, bucket: &str, key: &str, object: StoredObject) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        Self::ensure_parent_dir(&path).await?;

        fs::write(&path, &object.data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        self.write_sidecar(
            bucket,
            key,
            &Sidecar {
                content_type: object.content_type,
                metadata: object.metadata,
            },
        )
        .await?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = object.data.len() as u64,
            "Local upload successful"
        );

        Ok(())
    }

    async fn copy(&self, spec: &CopySpec) -> StorageResult<()> {
        let from = self.object_path(&spec.source_bucket, &spec.source_key)?;
        let to = self.object_path(&spec.target_bucket, &spec.target_key)?;

        if !fs::try_exists(&from).await? {
            return Err(StorageError::NotFound(format!(
                "{}/{}",
                spec.source_bucket, spec.source_key
            )));
        }

        Self::ensure_parent_dir(&to).await?;
        fs::copy(&from, &to)
            .await
            .map_err(|e| StorageError::CopyFailed(e.to_string()))?;

        let sidecar = self.read_sidecar(&spec.source_bucket, &spec.source_key).await?;
        self.write_sidecar(&spec.target_bucket, &spec.target_key, &sidecar)
            .await?;

        tracing::debug!(
            source_key = %spec.source_key,
            target_key = %spec.target_key,
            "Local copy successful"
        );

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::DeleteFailed(e.to_string())),
        }

        match fs::remove_file(self.sidecar_path(bucket, key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::DeleteFailed(e.to_string())),
        }

        tracing::debug!(bucket = %bucket, key = %key, "Local delete successful");
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let path = self.object_path(bucket, key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).await.unwrap();
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get_with_metadata() {
        let (storage, _temp) = create_test_storage().await;

        let object = StoredObject::new(b"hello".to_vec(), "text/plain").with_metadata("img-processed", "true");
        storage.put("out", "thumbs/a.txt", object).await.unwrap();

        let fetched = storage.get("out", "thumbs/a.txt").await.unwrap();
        assert_eq!(fetched.data.as_ref(), b"hello");
        assert_eq!(fetched.content_type.as_deref(), Some("text/plain"));
        assert_eq!(fetched.metadata_value("img-processed"), Some("true"));
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let (storage, _temp) = create_test_storage().await;
        let result = storage.get("out", "missing.jpg").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_copy_across_buckets_keeps_source() {
        let (storage, _temp) = create_test_storage().await;
        storage
            .put("uploads", "clip.mov", StoredObject::new(b"video".to_vec(), "video/quicktime"))
            .await
            .unwrap();

        let spec = CopySpec {
            source_bucket: "uploads".to_string(),
            source_key: "clip.mov".to_string(),
            target_bucket: "archive".to_string(),
            target_key: "videos/abc.mov".to_string(),
        };
        storage.copy(&spec).await.unwrap();

        assert!(storage.exists("uploads", "clip.mov").await.unwrap());
        let copied = storage.get("archive", "videos/abc.mov").await.unwrap();
        assert_eq!(copied.data.as_ref(), b"video");
        assert_eq!(copied.content_type.as_deref(), Some("video/quicktime"));
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let (storage, _temp) = create_test_storage().await;
        let spec = CopySpec {
            source_bucket: "uploads".to_string(),
            source_key: "nope.mov".to_string(),
            target_bucket: "archive".to_string(),
            target_key: "videos/abc.mov".to_string(),
        };
        assert!(matches!(
            storage.copy(&spec).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists("archive", "videos/abc.mov").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (storage, _temp) = create_test_storage().await;
        storage
            .put("b", "k.jpg", StoredObject::new(b"x".to_vec(), "image/jpeg"))
            .await
            .unwrap();

        storage.delete("b", "k.jpg").await.unwrap();
        assert!(!storage.exists("b", "k.jpg").await.unwrap());
        storage.delete("b", "k.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let (storage, _temp) = create_test_storage().await;
        for key in ["../escape.jpg", "/abs.jpg", "a/../../b.jpg"] {
            let result = storage
                .put("b", key, StoredObject::new(b"x".to_vec(), "image/jpeg"))
                .await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{}", key);
        }
        assert!(matches!(
            storage.get("../etc", "passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
        for bucket in [META_DIR.to_string(), format!("{}/b", META_DIR)] {
            let result = storage
                .put(&bucket, "x.jpg", StoredObject::new(b"x".to_vec(), "image/jpeg"))
                .await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{}", bucket);
        }
    }

    #[tokio::test]
    async fn test_dotted_keys_are_ordinary_objects() {
        let (storage, _temp) = create_test_storage().await;
        for key in [".metadata.jpg", ".meta/b/x.json", "photos/.meta"] {
            storage
                .put("b", key, StoredObject::new(b"x".to_vec(), "image/jpeg"))
                .await
                .unwrap();
            assert!(storage.exists("b", key).await.unwrap(), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_folder_key_reads_empty() {
        let (storage, temp) = create_test_storage().await;
        std::fs::create_dir_all(temp.path().join("b").join("photos")).unwrap();

        let object = storage.get("b", "photos/").await.unwrap();
        assert!(object.is_empty());
    }
}
