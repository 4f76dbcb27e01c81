//! Row construction for the tabular record.
//!
//! One submission flattens to one row per inspection item, header and
//! participant cells repeated on every row. A submission with no items still
//! produces exactly one placeholder row so the record never misses a form.

use vistoria_core::models::{InspectionId, InspectionSubmission, UploadOutcome};

/// Canonical column order: inspection id, date, time, department, supervisor,
/// QSMS responsible, contract manager, unit, location, notification email,
/// participant names, participant roles, item sequence, observed fact,
/// recommendations, due date, responsible, conclusion note, evidence cell,
/// overall conclusion, inspector signature cell, unit-responsible signature
/// cell.
pub const COLUMN_COUNT: usize = 22;

pub const NO_ITEMS_SENTINEL: &str = "no items were added";
pub const NO_EVIDENCE_SENTINEL: &str = "none";
pub const NOT_SIGNED_SENTINEL: &str = "not signed";

const EVIDENCE_LINK_LABEL: &str = "view evidence";
const SIGNATURE_LINK_LABEL: &str = "view signature";

/// Spreadsheet-native hyperlink formula. Rendered as a clickable label when
/// the append call uses user-entered input interpretation.
pub fn hyperlink(url: &str, label: &str) -> String {
    format!("=HYPERLINK(\"{}\",\"{}\")", url, label)
}

fn failure_marker(reason: &str) -> String {
    format!("upload failed: {}", reason)
}

fn artifact_cell(outcome: Option<&UploadOutcome>, link_label: &str, absent: &str) -> String {
    match outcome {
        None => absent.to_string(),
        Some(UploadOutcome::Uploaded { url }) => hyperlink(url, link_label),
        Some(UploadOutcome::Failed { reason }) => failure_marker(reason),
    }
}

/// Evidence cell for one item. `None` means no photo was supplied.
pub fn evidence_cell(outcome: Option<&UploadOutcome>) -> String {
    artifact_cell(outcome, EVIDENCE_LINK_LABEL, NO_EVIDENCE_SENTINEL)
}

/// Signature cell. `None` means the signature was absent or classified blank
/// upstream; no upload is attempted for those.
pub fn signature_cell(outcome: Option<&UploadOutcome>) -> String {
    artifact_cell(outcome, SIGNATURE_LINK_LABEL, NOT_SIGNED_SENTINEL)
}

/// Signature cells resolved once per submission. Every row of a multi-item
/// submission carries these exact values; resolving inside the per-item loop
/// would let rows of one submission disagree about their own signatures.
#[derive(Debug, Clone)]
pub struct SignatureCells {
    pub inspector: String,
    pub unit_responsible: String,
}

impl SignatureCells {
    pub fn resolve(
        inspector: Option<&UploadOutcome>,
        unit_responsible: Option<&UploadOutcome>,
    ) -> Self {
        SignatureCells {
            inspector: signature_cell(inspector),
            unit_responsible: signature_cell(unit_responsible),
        }
    }
}

fn header_cells(submission: &InspectionSubmission, inspection_id: &InspectionId) -> Vec<String> {
    let header = &submission.header;
    let names = submission
        .participants
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let roles = submission
        .participants
        .iter()
        .map(|p| p.role.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        inspection_id.to_string(),
        header.date.clone(),
        header.time.clone(),
        header.department.clone(),
        header.supervisor.clone(),
        header.qsms_responsible.clone(),
        header.contract_manager.clone(),
        header.unit.clone(),
        header.location.clone(),
        header.notification_email.clone().unwrap_or_default(),
        names,
        roles,
    ]
}

fn push_tail(row: &mut Vec<String>, conclusion: &str, signatures: &SignatureCells) {
    row.push(conclusion.to_string());
    row.push(signatures.inspector.clone());
    row.push(signatures.unit_responsible.clone());
}

/// Build every row of one submission.
///
/// `evidence` is indexed in item order; a `None` entry means the item carried
/// no photo. Always returns at least one row.
pub fn build_rows(
    submission: &InspectionSubmission,
    inspection_id: &InspectionId,
    evidence: &[Option<UploadOutcome>],
    signatures: &SignatureCells,
) -> Vec<Vec<String>> {
    let base = header_cells(submission, inspection_id);

    if submission.items.is_empty() {
        let mut row = base;
        for _ in 0..6 {
            row.push(NO_ITEMS_SENTINEL.to_string());
        }
        row.push(NO_EVIDENCE_SENTINEL.to_string());
        push_tail(&mut row, &submission.conclusion, signatures);
        debug_assert_eq!(row.len(), COLUMN_COUNT);
        return vec![row];
    }

    submission
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut row = base.clone();
            row.push(item.sequence_number.to_string());
            row.push(item.observed_fact.clone());
            row.push(item.recommendations.clone());
            row.push(item.due_date.clone());
            row.push(item.responsible.clone());
            row.push(item.conclusion_note.clone());
            row.push(evidence_cell(
                evidence.get(index).and_then(|outcome| outcome.as_ref()),
            ));
            push_tail(&mut row, &submission.conclusion, signatures);
            debug_assert_eq!(row.len(), COLUMN_COUNT);
            row
        })
        .collect()
}
