//! PDF summary of one inspection submission.
//!
//! Rendering is split in two phases: `paginate` produces pure positioned
//! blocks (testable without parsing PDF bytes), `emit_pdf` serializes them.
//! A link is only rendered for a resolved, successful upload; an absent or
//! failed artifact renders as plain annotated text so the document never
//! contains a dead link.

mod layout;
mod writer;

pub use layout::{LayoutBuilder, Page, TextBlock, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
pub use writer::emit_pdf;

use chrono::Utc;
use vistoria_core::models::{InspectionId, InspectionSubmission, UploadOutcome};

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

/// Filename under which the document travels (mail attachment, storage).
pub fn document_filename(inspection_id: &InspectionId) -> String {
    format!("inspection-{}.pdf", inspection_id)
}

fn field(layout: &mut LayoutBuilder, label: &str, value: &str) {
    layout.text(&format!("{}: {}", label, value), BODY_SIZE, false);
}

/// Evidence or signature reference: link when uploaded, fallback text
/// otherwise. `outcome` is None when no artifact was supplied (no photo /
/// blank signature).
fn artifact_line(
    layout: &mut LayoutBuilder,
    label: &str,
    outcome: Option<&UploadOutcome>,
    link_label: &str,
    absent_text: &str,
) {
    match outcome {
        Some(UploadOutcome::Uploaded { url }) => {
            layout.text(&format!("{}:", label), BODY_SIZE, false);
            layout.link(link_label, url, BODY_SIZE);
        }
        Some(UploadOutcome::Failed { reason }) => {
            field(layout, label, &format!("upload failed: {}", reason));
        }
        None => field(layout, label, absent_text),
    }
}

/// Lay out the full submission in the fixed section order. Pure apart from
/// the generation timestamp in the header.
pub fn paginate(
    submission: &InspectionSubmission,
    inspection_id: &InspectionId,
    inspector_signature: Option<&UploadOutcome>,
    responsible_signature: Option<&UploadOutcome>,
    evidence: &[Option<UploadOutcome>],
) -> Vec<Page> {
    let mut layout = LayoutBuilder::new();
    let header = &submission.header;

    layout.text("Field Inspection Report", TITLE_SIZE, true);
    layout.text(&format!("Inspection {}", inspection_id), BODY_SIZE, false);
    layout.text(
        &format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        BODY_SIZE,
        false,
    );
    layout.gap(BODY_SIZE);

    layout.text("Inspection data", HEADING_SIZE, true);
    field(&mut layout, "Date", &header.date);
    field(&mut layout, "Time", &header.time);
    field(&mut layout, "Department", &header.department);
    field(&mut layout, "Supervisor", &header.supervisor);
    field(&mut layout, "QSMS responsible", &header.qsms_responsible);
    field(&mut layout, "Contract manager", &header.contract_manager);
    field(&mut layout, "Unit", &header.unit);
    field(&mut layout, "Location", &header.location);
    layout.gap(BODY_SIZE);

    layout.text("Participants", HEADING_SIZE, true);
    for (index, participant) in submission.participants.iter().enumerate() {
        layout.text(
            &format!("{}. {} - {}", index + 1, participant.name, participant.role),
            BODY_SIZE,
            false,
        );
    }
    layout.gap(BODY_SIZE);

    layout.text("Items", HEADING_SIZE, true);
    if submission.items.is_empty() {
        layout.text("No items were added", BODY_SIZE, false);
    }
    for (index, item) in submission.items.iter().enumerate() {
        layout.text(&format!("Item {}", item.sequence_number), BODY_SIZE, true);
        field(&mut layout, "Observed fact", &item.observed_fact);
        artifact_line(
            &mut layout,
            "Photo",
            evidence.get(index).and_then(|outcome| outcome.as_ref()),
            "view evidence",
            "none",
        );
        field(&mut layout, "Recommendations", &item.recommendations);
        field(&mut layout, "Due date", &item.due_date);
        field(&mut layout, "Responsible", &item.responsible);
        field(&mut layout, "Conclusion", &item.conclusion_note);
        layout.gap(BODY_SIZE);
    }

    layout.text("Overall conclusion", HEADING_SIZE, true);
    layout.text(&submission.conclusion, BODY_SIZE, false);
    layout.gap(BODY_SIZE);

    layout.text("Signatures", HEADING_SIZE, true);
    artifact_line(
        &mut layout,
        "Inspector",
        inspector_signature,
        "view signature",
        "not signed",
    );
    artifact_line(
        &mut layout,
        "Unit responsible",
        responsible_signature,
        "view signature",
        "not signed",
    );

    layout.into_pages()
}

/// Render the submission to PDF bytes. Infallible by construction: the
/// layout is pure and the writer cannot fail on in-memory output.
pub fn render(
    submission: &InspectionSubmission,
    inspection_id: &InspectionId,
    inspector_signature: Option<&UploadOutcome>,
    responsible_signature: Option<&UploadOutcome>,
    evidence: &[Option<UploadOutcome>],
) -> Vec<u8> {
    emit_pdf(&paginate(
        submission,
        inspection_id,
        inspector_signature,
        responsible_signature,
        evidence,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistoria_core::models::{InspectionItem, Participant};

    fn item(seq: u32) -> InspectionItem {
        InspectionItem {
            sequence_number: seq,
            observed_fact: format!("finding {}", seq),
            recommendations: "fix it".to_string(),
            due_date: "2024-06-01".to_string(),
            responsible: "A. Silva".to_string(),
            conclusion_note: "pending".to_string(),
            photo: None,
        }
    }

    fn submission_with_items(count: u32) -> InspectionSubmission {
        InspectionSubmission {
            participants: vec![Participant {
                name: "B. Costa".to_string(),
                role: "technician".to_string(),
            }],
            items: (1..=count).map(item).collect(),
            conclusion: "overall ok".to_string(),
            ..Default::default()
        }
    }

    fn all_blocks(pages: &[Page]) -> Vec<&TextBlock> {
        pages.iter().flat_map(|p| p.blocks.iter()).collect()
    }

    #[test]
    fn long_submission_spans_multiple_pages() {
        let submission = submission_with_items(40);
        let evidence: Vec<Option<UploadOutcome>> = vec![None; 40];
        let pages = paginate(&submission, &InspectionId::new(), None, None, &evidence);
        assert!(pages.len() >= 2);
        for page in &pages {
            for block in &page.blocks {
                assert!(block.y >= MARGIN && block.y <= PAGE_HEIGHT - MARGIN);
            }
        }
    }

    #[test]
    fn links_only_for_uploaded_artifacts() {
        let submission = submission_with_items(2);
        let evidence = vec![
            Some(UploadOutcome::Uploaded {
                url: "https://store/evidence/1.png".to_string(),
            }),
            Some(UploadOutcome::Failed {
                reason: "quota exceeded".to_string(),
            }),
        ];
        let signature = UploadOutcome::Uploaded {
            url: "https://store/signatures/inspector.png".to_string(),
        };
        let pages = paginate(
            &submission,
            &InspectionId::new(),
            Some(&signature),
            None,
            &evidence,
        );
        let blocks = all_blocks(&pages);

        let links: Vec<_> = blocks.iter().filter(|b| b.link.is_some()).collect();
        assert_eq!(links.len(), 2, "one evidence link and one signature link");
        // The URL in the link is the uploader's URL, untransformed.
        assert!(links
            .iter()
            .any(|b| b.link.as_deref() == Some("https://store/evidence/1.png")));
        assert!(blocks
            .iter()
            .any(|b| b.text.contains("upload failed: quota exceeded")));
        assert!(blocks.iter().any(|b| b.text.contains("not signed")));
    }

    #[test]
    fn empty_item_list_renders_sentinel() {
        let submission = InspectionSubmission::default();
        let pages = paginate(&submission, &InspectionId::new(), None, None, &[]);
        assert!(all_blocks(&pages)
            .iter()
            .any(|b| b.text == "No items were added"));
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let submission = submission_with_items(1);
        let bytes = render(&submission, &InspectionId::new(), None, None, &[None]);
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn document_filename_carries_inspection_id() {
        let id = InspectionId::new();
        let name = document_filename(&id);
        assert!(name.starts_with("inspection-"));
        assert!(name.ends_with(".pdf"));
        assert!(name.contains(&id.to_string()));
    }
}
