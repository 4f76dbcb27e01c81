//! Data-URL image decoding and blank-signature classification.
//!
//! The signature pad pre-fills its canvas entirely white, so an untouched pad
//! encodes to a byte stream dominated by the white-pixel pattern and/or a very
//! small payload. The classifier here is a cheap byte-pattern proxy for that,
//! not real image analysis: it has a known false-negative risk on sparse or
//! very light signatures. It is kept behind the `BlankClassifier` trait so a
//! proper image-based implementation can replace it without touching callers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Payloads below this size cannot plausibly contain ink.
pub const MIN_SIGNATURE_BYTES: usize = 500;
/// Payloads below this size are treated as an untouched pad even when the
/// white-pixel scan is inconclusive.
const SPARSE_SIGNATURE_BYTES: usize = 1000;
/// Fraction of the hex rendition covered by the white-pixel pattern above
/// which the image is considered blank.
const WHITE_FRACTION_THRESHOLD: f64 = 0.95;
/// Hex pattern of a pure white pixel.
const WHITE_PIXEL_HEX: &str = "ffffff";

const DATA_URL_PREFIX: &str = "data:image/";

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The value does not match the embedded-image shape at all. Treated as
    /// "absent" by callers, never as a failure.
    #[error("value is not an embedded image")]
    NotAnImage,

    #[error("embedded image has no base64 separator")]
    MissingSeparator,

    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// A decoded embedded raster image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension derived from the media type, used in storage keys.
    pub fn extension(&self) -> &str {
        match self.media_type.as_str() {
            "image/jpeg" => "jpg",
            other => other
                .strip_prefix("image/")
                .filter(|s| !s.is_empty())
                .unwrap_or("bin"),
        }
    }
}

/// Strict check for the canonical embedded-image shape. Anything else,
/// including a previous fallback marker string, counts as absent.
pub fn is_data_url(value: &str) -> bool {
    value.starts_with(DATA_URL_PREFIX)
}

/// Decode an embedded raster reference into its media type and raw bytes.
pub fn decode_data_url(value: &str) -> Result<DecodedImage, DecodeError> {
    if !is_data_url(value) {
        return Err(DecodeError::NotAnImage);
    }
    let rest = &value["data:".len()..];
    let (media_type, payload) = rest
        .split_once(";base64,")
        .ok_or(DecodeError::MissingSeparator)?;
    let bytes = STANDARD.decode(payload)?;
    Ok(DecodedImage {
        media_type: media_type.to_string(),
        bytes,
    })
}

/// Swappable blank-signature detection strategy.
pub trait BlankClassifier: Send + Sync {
    /// Whether the encoded signature contains no meaningful ink. Must be pure
    /// and deterministic.
    fn is_blank(&self, encoded: Option<&str>) -> bool;
}

/// Default classifier: white-pixel byte-pattern scan plus size thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitePixelHeuristic;

impl BlankClassifier for WhitePixelHeuristic {
    fn is_blank(&self, encoded: Option<&str>) -> bool {
        let Some(value) = encoded else {
            return true;
        };
        if !is_data_url(value) {
            return true;
        }
        let decoded = match decode_data_url(value) {
            Ok(decoded) => decoded,
            // Fail open: a parsing bug must not silently discard a real
            // signature, so a malformed payload counts as signed.
            Err(_) => return false,
        };
        if decoded.bytes.len() < MIN_SIGNATURE_BYTES {
            return true;
        }
        let hex = hex::encode(&decoded.bytes);
        let covered = hex.matches(WHITE_PIXEL_HEX).count() * WHITE_PIXEL_HEX.len();
        let white_fraction = covered as f64 / hex.len() as f64;
        white_fraction > WHITE_FRACTION_THRESHOLD || decoded.bytes.len() < SPARSE_SIGNATURE_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_url(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    /// Bytes with no three consecutive 0xff, i.e. no white-pixel pattern.
    fn inked_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn decode_rejects_non_image_values() {
        assert!(matches!(
            decode_data_url("not signed"),
            Err(DecodeError::NotAnImage)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain;base64,aGk="),
            Err(DecodeError::NotAnImage)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawpayload"),
            Err(DecodeError::MissingSeparator)
        ));
    }

    #[test]
    fn decode_round_trips_media_type_and_bytes() {
        let decoded = decode_data_url(&data_url(b"hello")).expect("decode");
        assert_eq!(decoded.media_type, "image/png");
        assert_eq!(decoded.bytes, b"hello");
        assert_eq!(decoded.extension(), "png");
    }

    #[test]
    fn jpeg_extension_is_jpg() {
        let image = DecodedImage {
            media_type: "image/jpeg".to_string(),
            bytes: vec![],
        };
        assert_eq!(image.extension(), "jpg");
    }

    #[test]
    fn absent_input_is_blank() {
        let classifier = WhitePixelHeuristic;
        assert!(classifier.is_blank(None));
        assert!(classifier.is_blank(Some("")));
        assert!(classifier.is_blank(Some("not signed")));
    }

    #[test]
    fn tiny_payload_is_blank() {
        let classifier = WhitePixelHeuristic;
        assert!(classifier.is_blank(Some(&data_url(&inked_bytes(100)))));
    }

    #[test]
    fn sparse_payload_is_blank_even_without_white_pixels() {
        let classifier = WhitePixelHeuristic;
        assert!(classifier.is_blank(Some(&data_url(&inked_bytes(999)))));
    }

    #[test]
    fn all_white_payload_is_blank() {
        let classifier = WhitePixelHeuristic;
        assert!(classifier.is_blank(Some(&data_url(&vec![0xff; 4096]))));
    }

    #[test]
    fn inked_payload_is_not_blank() {
        let classifier = WhitePixelHeuristic;
        assert!(!classifier.is_blank(Some(&data_url(&inked_bytes(4096)))));
    }

    #[test]
    fn malformed_payload_fails_open() {
        let classifier = WhitePixelHeuristic;
        assert!(!classifier.is_blank(Some("data:image/png;base64,@@not-base64@@")));
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = WhitePixelHeuristic;
        let encoded = data_url(&inked_bytes(4096));
        let first = classifier.is_blank(Some(&encoded));
        for _ in 0..10 {
            assert_eq!(classifier.is_blank(Some(&encoded)), first);
        }
    }
}
