//! Domain models for one inspection submission.
//!
//! All entities here are created fresh per request and discarded after the
//! response is sent; nothing is cached or persisted between requests.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Per-submission correlation key. Every derived artifact (signature objects,
/// evidence objects, the PDF filename) and every appended row carries this id
/// so a human can correlate them across the external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionId(Uuid);

impl InspectionId {
    pub fn new() -> Self {
        InspectionId(Uuid::new_v4())
    }
}

impl Default for InspectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InspectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Header metadata of the inspection form. All fields are free text as typed
/// by the submitter; the core does not re-validate dates or locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionHeader {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub qsms_responsible: String,
    #[serde(default)]
    pub contract_manager: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    /// Recipient for the PDF notification. Empty or missing means no email.
    #[serde(default)]
    pub notification_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

/// One finding of the inspection. `sequence_number` is 1-based and dense; the
/// form re-numbers on removal, the core takes it as given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionItem {
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub observed_fact: String,
    #[serde(default)]
    pub recommendations: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub conclusion_note: String,
    /// Embedded raster (data URL) or absent. Any value that does not match
    /// the embedded-image shape is treated as absent downstream.
    #[serde(default)]
    pub photo: Option<String>,
}

/// The two handwritten signatures, each independently nullable/blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureImages {
    #[serde(default)]
    pub inspector: Option<String>,
    #[serde(default)]
    pub unit_responsible: Option<String>,
}

/// The full submission payload as received from the form. Immutable once
/// received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSubmission {
    #[serde(default)]
    pub header: InspectionHeader,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub items: Vec<InspectionItem>,
    #[serde(default)]
    pub conclusion: String,
    #[serde(default)]
    pub signatures: SignatureImages,
}

/// Result of one artifact upload attempt. The absence of a URL is always
/// representable and propagates as such through every consumer; the uploader
/// never raises past its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { url: String },
    Failed { reason: String },
}

impl UploadOutcome {
    /// The public URL, if the upload succeeded.
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Uploaded { url } => Some(url),
            UploadOutcome::Failed { .. } => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}

/// Success envelope returned to the form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub inspection_id: InspectionId,
}
