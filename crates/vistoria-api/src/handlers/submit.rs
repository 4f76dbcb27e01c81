//! Submission endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use vistoria_core::models::InspectionSubmission;

use crate::error::{HttpAppError, ValidatedJson};
use crate::services::pipeline::process_submission;
use crate::state::AppState;

/// POST /api/v1/inspections
///
/// Receives one filled inspection form and runs the full pipeline. The
/// response is `{success: true, inspectionId}` or the failure envelope.
#[tracing::instrument(skip_all, fields(items = submission.items.len()))]
pub async fn submit_inspection(
    State(state): State<Arc<AppState>>,
    ValidatedJson(submission): ValidatedJson<InspectionSubmission>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = process_submission(&state, submission)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(response))
}
