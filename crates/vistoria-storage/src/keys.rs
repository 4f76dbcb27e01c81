//! Shared key generation for storage backends.
//!
//! All artifacts of one submission share its inspection id, so a human can
//! correlate a spreadsheet row, the PDF, and the stored objects.

use vistoria_core::models::InspectionId;

/// Which of the two signature slots an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureSlot {
    Inspector,
    UnitResponsible,
}

impl SignatureSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureSlot::Inspector => "inspector",
            SignatureSlot::UnitResponsible => "unit-responsible",
        }
    }
}

/// Storage key for a signature image.
pub fn signature_key(inspection_id: &InspectionId, slot: SignatureSlot, extension: &str) -> String {
    format!("signatures/{}/{}.{}", inspection_id, slot.as_str(), extension)
}

/// Storage key for an item's evidence photo.
pub fn evidence_key(inspection_id: &InspectionId, sequence_number: u32, extension: &str) -> String {
    format!(
        "evidence/{}/item-{}.{}",
        inspection_id, sequence_number, extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_inspection_id() {
        let id = InspectionId::new();
        let signature = signature_key(&id, SignatureSlot::Inspector, "png");
        let evidence = evidence_key(&id, 3, "jpg");

        assert_eq!(signature, format!("signatures/{}/inspector.png", id));
        assert_eq!(evidence, format!("evidence/{}/item-3.jpg", id));
    }

    #[test]
    fn signature_slots_have_distinct_keys() {
        let id = InspectionId::new();
        assert_ne!(
            signature_key(&id, SignatureSlot::Inspector, "png"),
            signature_key(&id, SignatureSlot::UnitResponsible, "png")
        );
    }
}
