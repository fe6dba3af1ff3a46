use serde_json::Value;

/// Shapes of evidence documents the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceFormat {
    /// `labels` / `textDetected` / `dominantColors` / `spoofDetection`.
    Canonical,
    /// A single image-annotation response (`labelAnnotations`, ...).
    VisionResponse,
    /// `{"responses": [...]}`.
    VisionBatch,
    Unrecognized,
}

const VISION_KEYS: &[&str] = &[
    "labelAnnotations",
    "logoAnnotations",
    "textAnnotations",
    "fullTextAnnotation",
    "safeSearchAnnotation",
    "imagePropertiesAnnotation",
    "error",
];

/// Auto-detect the evidence document shape by looking for known top-level keys.
pub fn detect_format(doc: &Value) -> EvidenceFormat {
    let Some(obj) = doc.as_object() else {
        return EvidenceFormat::Unrecognized;
    };

    if obj.get("responses").map_or(false, Value::is_array) {
        return EvidenceFormat::VisionBatch;
    }

    if VISION_KEYS.iter().any(|k| obj.contains_key(*k)) {
        return EvidenceFormat::VisionResponse;
    }

    EvidenceFormat::Canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect() {
        assert_eq!(detect_format(&json!({ "labels": [] })), EvidenceFormat::Canonical);
        assert_eq!(detect_format(&json!({})), EvidenceFormat::Canonical);
        assert_eq!(
            detect_format(&json!({ "safeSearchAnnotation": {} })),
            EvidenceFormat::VisionResponse
        );
        assert_eq!(
            detect_format(&json!({ "responses": [] })),
            EvidenceFormat::VisionBatch
        );
        assert_eq!(detect_format(&json!("text")), EvidenceFormat::Unrecognized);
    }
}
