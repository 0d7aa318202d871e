//! Mediaflow Storage Library
//!
//! This crate provides the object storage abstraction used by the pipelines and
//! its implementations for S3 and the local filesystem.
//!
//! Unlike a single-bucket store, every operation names its bucket explicitly:
//! uploads arrive in one bucket and variants/archives are written to another.
//! The local backend maps each bucket to a directory under its root.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, StorageSettings};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{
    ObjectStorage, StorageBackend, StorageError, StorageResult, StoredObject,
};
