//! The submission pipeline.
//!
//! One submission flows through: classify signatures, upload artifacts
//! concurrently, build rows, render the PDF, notify, append to the tabular
//! store. The append is the only external call allowed to fail the request;
//! everything before it degrades to visible fallback values, and notification
//! failure is logged only. Rendering and notification happen before the
//! append so a late failure cannot orphan an already-recorded submission's
//! notification.

use futures::future::join_all;

use vistoria_core::models::{
    InspectionId, InspectionItem, InspectionSubmission, SubmitResponse, UploadOutcome,
};
use vistoria_core::AppError;
use vistoria_processing::pdf;
use vistoria_processing::signature::{is_data_url, BlankClassifier};
use vistoria_sheets::{build_rows, SignatureCells};
use vistoria_storage::SignatureSlot;

use crate::services::artifacts::ArtifactUploader;
use crate::state::AppState;

/// Process one submission end to end.
pub async fn process_submission(
    state: &AppState,
    submission: InspectionSubmission,
) -> Result<SubmitResponse, AppError> {
    let Some(sheets) = &state.sheets else {
        return Err(AppError::Config(
            "spreadsheet credentials are not set".to_string(),
        ));
    };

    let inspection_id = InspectionId::new();
    let uploader = ArtifactUploader::new(state.storage.clone());

    // All artifact uploads are independent single-attempt I/O; issue them
    // concurrently and join before anything needs the outcomes.
    let inspector = resolve_signature(
        &uploader,
        state.classifier.as_ref(),
        submission.signatures.inspector.as_deref(),
        &inspection_id,
        SignatureSlot::Inspector,
    );
    let responsible = resolve_signature(
        &uploader,
        state.classifier.as_ref(),
        submission.signatures.unit_responsible.as_deref(),
        &inspection_id,
        SignatureSlot::UnitResponsible,
    );
    let evidence_uploads = join_all(
        submission
            .items
            .iter()
            .map(|item| resolve_evidence(&uploader, item, &inspection_id)),
    );

    let (inspector, responsible, evidence) =
        tokio::join!(inspector, responsible, evidence_uploads);

    let signatures = SignatureCells::resolve(inspector.as_ref(), responsible.as_ref());
    let rows = build_rows(&submission, &inspection_id, &evidence, &signatures);

    let document = pdf::render(
        &submission,
        &inspection_id,
        inspector.as_ref(),
        responsible.as_ref(),
        &evidence,
    );

    notify(state, &submission, &document, &inspection_id).await;

    sheets
        .append_rows(rows)
        .await
        .map_err(|err| AppError::SheetAppend(err.to_string()))?;

    tracing::info!(
        inspection_id = %inspection_id,
        items = submission.items.len(),
        "Submission recorded"
    );

    Ok(SubmitResponse {
        success: true,
        inspection_id,
    })
}

/// Upload a signature unless it classifies as blank. Blank signatures are
/// never uploaded; they resolve to `None` and render as "not signed".
async fn resolve_signature(
    uploader: &ArtifactUploader,
    classifier: &dyn BlankClassifier,
    encoded: Option<&str>,
    inspection_id: &InspectionId,
    slot: SignatureSlot,
) -> Option<UploadOutcome> {
    if classifier.is_blank(encoded) {
        return None;
    }
    let encoded = encoded?;
    Some(
        uploader
            .upload_signature(encoded, inspection_id, slot)
            .await,
    )
}

/// Upload an item's evidence photo if one was supplied. A value that does
/// not look like an embedded image counts as no photo; blank classification
/// applies only to signatures.
async fn resolve_evidence(
    uploader: &ArtifactUploader,
    item: &InspectionItem,
    inspection_id: &InspectionId,
) -> Option<UploadOutcome> {
    let photo = item.photo.as_deref().filter(|value| is_data_url(value))?;
    Some(
        uploader
            .upload_evidence(photo, inspection_id, item.sequence_number)
            .await,
    )
}

async fn notify(
    state: &AppState,
    submission: &InspectionSubmission,
    document: &[u8],
    inspection_id: &InspectionId,
) {
    let Some(notifier) = &state.notifier else {
        return;
    };
    let Some(recipient) = submission.header.notification_email.as_deref() else {
        return;
    };
    if recipient.trim().is_empty() {
        return;
    }
    if !notifier.notify(recipient, document, inspection_id).await {
        tracing::warn!(inspection_id = %inspection_id, "Notification was not delivered");
    }
}
