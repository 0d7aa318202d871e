//! In-memory object storage recording every call

use async_trait::async_trait;
use bytes::Bytes;
use mediaflow_core::CopySpec;
use mediaflow_storage::{ObjectStorage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{Call, CallLog};

pub struct MockStorage {
    calls: CallLog,
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    fail_copy: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockStorage {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            objects: Mutex::new(HashMap::new()),
            fail_copy: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, bucket: &str, key: &str, data: &'static [u8]) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject::new(Bytes::from_static(data), "application/octet-stream"),
        );
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn fail_copy(&self) {
        self.fail_copy.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        self.calls.record(Call::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn put(&self, bucket: &str, key: &str, object: StoredObject) -> StorageResult<()> {
        self.calls.record(Call::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), object);
        Ok(())
    }

    async fn copy(&self, spec: &CopySpec) -> StorageResult<()> {
        self.calls.record(Call::Copy(spec.clone()));
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(StorageError::CopyFailed("Access Denied".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        let source = objects
            .get(&(spec.source_bucket.clone(), spec.source_key.clone()))
            .cloned()
            .ok_or_else(|| {
                StorageError::NotFound(format!("{}/{}", spec.source_bucket, spec.source_key))
            })?;
        objects.insert(
            (spec.target_bucket.clone(), spec.target_key.clone()),
            source,
        );
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.calls.record(Call::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("Access Denied".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        self.calls.record(Call::Exists {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        Ok(self.contains(bucket, key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
