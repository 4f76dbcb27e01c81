//! Vistoria API
//!
//! HTTP surface of the inspection submission pipeline: one endpoint that
//! receives a filled inspection form, uploads its images, renders the PDF
//! report, emails it, and records the submission in the tabular store.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
