//! Vistoria Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all Vistoria components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    InspectionHeader, InspectionId, InspectionItem, InspectionSubmission, Participant,
    SignatureImages, SubmitResponse, UploadOutcome,
};
pub use storage_types::StorageBackend;
