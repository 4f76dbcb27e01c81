//! Vistoria Processing Library
//!
//! Image decoding, blank-signature classification, and PDF rendering for
//! inspection submissions.

pub mod pdf;
pub mod signature;

// Re-export commonly used types
pub use pdf::{document_filename, paginate, render, Page, TextBlock};
pub use signature::{
    decode_data_url, is_data_url, BlankClassifier, DecodeError, DecodedImage, WhitePixelHeuristic,
};
