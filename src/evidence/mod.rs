//! Raw evidence intake.
//!
//! - [`normalize`]: turns provider outputs into a canonical [`EvidenceRecord`](crate::models::EvidenceRecord).
//! - [`vision`]: reads image-annotation responses (labels, logos, OCR text,
//!   spoof likelihood, dominant colors) into [`RawEvidence`].

pub mod normalize;
pub mod vision;

use serde_json::Value;

use crate::detector::{detect_format, EvidenceFormat};
use crate::error::InvalidEvidenceError;

pub use normalize::{normalize, normalize_with, RawEvidence, RawLabel};

/// Parse any supported evidence document into one raw evidence per image.
pub fn parse_document(doc: &Value) -> Result<Vec<RawEvidence>, InvalidEvidenceError> {
    match detect_format(doc) {
        EvidenceFormat::Canonical => serde_json::from_value(doc.clone())
            .map(|raw| vec![raw])
            .map_err(|e| InvalidEvidenceError::Shape(e.to_string())),
        EvidenceFormat::VisionResponse => vision::from_response(doc).map(|raw| vec![raw]),
        EvidenceFormat::VisionBatch => vision::from_batch(doc),
        EvidenceFormat::Unrecognized => Err(InvalidEvidenceError::Shape(
            "expected a JSON object with evidence fields".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_canonical_and_vision() {
        let canonical = json!({ "textDetected": "RBI", "spoofDetection": "LIKELY" });
        let parsed = parse_document(&canonical).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text_detected.as_deref(), Some("RBI"));

        let vision = json!({ "labelAnnotations": [{ "description": "Paper", "score": 0.5 }] });
        assert_eq!(parse_document(&vision).unwrap()[0].labels.len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse_document(&json!([1, 2, 3])),
            Err(InvalidEvidenceError::Shape(_))
        ));
    }

    #[test]
    fn test_wrong_field_type_is_shape_error() {
        let doc = json!({ "labels": "Paper" });
        assert!(matches!(
            parse_document(&doc),
            Err(InvalidEvidenceError::Shape(_))
        ));
    }
}
