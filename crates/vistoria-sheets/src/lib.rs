//! Vistoria Sheets Library
//!
//! The tabular store: a fixed-schema, append-only record of submissions in a
//! Google spreadsheet. Provides the `TabularStore` trait, the Sheets append
//! client with service-account authentication, and the row builder that
//! flattens one submission into spreadsheet rows.

pub mod auth;
pub mod client;
pub mod rows;

// Re-export commonly used types
pub use auth::ServiceAccountAuth;
pub use client::{SheetError, SheetsClient, TabularStore};
pub use rows::{build_rows, evidence_cell, signature_cell, SignatureCells, COLUMN_COUNT};
