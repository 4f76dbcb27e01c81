//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The submission pipeline only ever writes: artifacts are
//! uploaded once and referenced by public URL afterwards, never read back.

use async_trait::async_trait;
use thiserror::Error;
use vistoria_core::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait so
/// the artifact uploader can work with any backend without coupling to
/// implementation details.
///
/// **Key format:** see the crate root documentation; keys come from the
/// `keys` module.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data to the given storage key and return the publicly
    /// dereferenceable URL. The URL is a deterministic function of the
    /// storage location and key.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
