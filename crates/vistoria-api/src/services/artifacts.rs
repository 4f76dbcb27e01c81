//! Artifact uploads with graceful degradation.
//!
//! Every upload resolves to an `UploadOutcome`; nothing here ever fails the
//! request. Missing storage configuration, a value that is not an embedded
//! image, and a transfer error all degrade to `UploadOutcome::Failed` with a
//! human-readable reason that ends up visible in the spreadsheet row and the
//! PDF. Each upload is attempted exactly once, no retries.

use std::sync::Arc;

use vistoria_core::models::{InspectionId, UploadOutcome};
use vistoria_processing::signature::{decode_data_url, DecodeError};
use vistoria_storage::{evidence_key, signature_key, SignatureSlot, Storage};

const STORAGE_UNCONFIGURED: &str = "storage is not configured";
const NO_IMAGE_DATA: &str = "no image data";

pub struct ArtifactUploader {
    storage: Option<Arc<dyn Storage>>,
}

impl ArtifactUploader {
    pub fn new(storage: Option<Arc<dyn Storage>>) -> Self {
        ArtifactUploader { storage }
    }

    pub async fn upload_signature(
        &self,
        encoded: &str,
        inspection_id: &InspectionId,
        slot: SignatureSlot,
    ) -> UploadOutcome {
        self.upload(encoded, |extension| {
            signature_key(inspection_id, slot, extension)
        })
        .await
    }

    pub async fn upload_evidence(
        &self,
        encoded: &str,
        inspection_id: &InspectionId,
        sequence_number: u32,
    ) -> UploadOutcome {
        self.upload(encoded, |extension| {
            evidence_key(inspection_id, sequence_number, extension)
        })
        .await
    }

    async fn upload(
        &self,
        encoded: &str,
        make_key: impl FnOnce(&str) -> String,
    ) -> UploadOutcome {
        let Some(storage) = &self.storage else {
            return UploadOutcome::Failed {
                reason: STORAGE_UNCONFIGURED.to_string(),
            };
        };

        let decoded = match decode_data_url(encoded) {
            Ok(decoded) => decoded,
            Err(DecodeError::NotAnImage) => {
                return UploadOutcome::Failed {
                    reason: NO_IMAGE_DATA.to_string(),
                }
            }
            Err(err) => {
                return UploadOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };

        let key = make_key(decoded.extension());
        match storage
            .upload(&key, &decoded.media_type, decoded.bytes)
            .await
        {
            Ok(url) => UploadOutcome::Uploaded { url },
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Artifact upload failed");
                UploadOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
