//! Vistoria Storage Library
//!
//! Object-storage abstraction for inspection artifacts (signature images,
//! evidence photos).
//!
//! # Storage key format
//!
//! Keys are namespaced by artifact type and the inspection id so every
//! artifact of one submission is correlatable:
//!
//! - **Signatures**: `signatures/{inspection_id}/{slot}.{ext}`
//! - **Evidence**: `evidence/{inspection_id}/item-{seq}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{evidence_key, signature_key, SignatureSlot};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vistoria_core::StorageBackend;
