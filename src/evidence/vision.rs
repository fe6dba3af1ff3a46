use serde::Deserialize;
use serde_json::Value;

use crate::error::InvalidEvidenceError;

use super::normalize::{RawEvidence, RawLabel};

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    logo_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    full_text_annotation: Option<TextAnnotation>,
    safe_search_annotation: Option<SafeSearchAnnotation>,
    image_properties_annotation: Option<ImageProperties>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: Value,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct SafeSearchAnnotation {
    spoof: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
struct ColorInfo {
    color: Rgb,
}

/// Channels are floats in `[0, 255]`; absent channels are zero.
#[derive(Debug, Default, Deserialize)]
struct Rgb {
    #[serde(default)]
    red: f64,
    #[serde(default)]
    green: f64,
    #[serde(default)]
    blue: f64,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Convert a single image-annotation response into [`RawEvidence`].
pub fn from_response(doc: &Value) -> Result<RawEvidence, InvalidEvidenceError> {
    let response: AnnotateResponse = serde_json::from_value(doc.clone())
        .map_err(|e| InvalidEvidenceError::Shape(e.to_string()))?;
    convert(response)
}

/// Convert a batch document (`{"responses": [...]}`), one [`RawEvidence`] per image.
pub fn from_batch(doc: &Value) -> Result<Vec<RawEvidence>, InvalidEvidenceError> {
    let batch: BatchResponse = serde_json::from_value(doc.clone())
        .map_err(|e| InvalidEvidenceError::Shape(e.to_string()))?;
    batch.responses.into_iter().map(convert).collect()
}

fn convert(response: AnnotateResponse) -> Result<RawEvidence, InvalidEvidenceError> {
    if let Some(status) = response.error {
        return Err(InvalidEvidenceError::Provider(format!(
            "code {}: {}",
            status.code, status.message
        )));
    }

    // The first text annotation is the whole block; the rest are single words.
    let text_detected = response
        .full_text_annotation
        .map(|t| t.text)
        .or_else(|| {
            response
                .text_annotations
                .into_iter()
                .next()
                .map(|t| t.description)
        });

    let dominant_colors = response
        .image_properties_annotation
        .and_then(|p| p.dominant_colors)
        .map(|d| d.colors.iter().map(|c| to_hex(&c.color)).collect())
        .unwrap_or_default();

    Ok(RawEvidence {
        labels: to_labels(response.label_annotations),
        logos: to_labels(response.logo_annotations),
        text_detected,
        dominant_colors,
        spoof_detection: response.safe_search_annotation.and_then(|s| s.spoof),
        brand: None,
    })
}

fn to_labels(annotations: Vec<EntityAnnotation>) -> Vec<RawLabel> {
    annotations
        .into_iter()
        .map(|a| RawLabel {
            description: a.description,
            score: a.score,
        })
        .collect()
}

fn to_hex(rgb: &Rgb) -> String {
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb.red),
        channel(rgb.green),
        channel(rgb.blue)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "labelAnnotations": [
                { "mid": "/m/0", "description": "Banknote", "score": 0.96 },
                { "mid": "/m/1", "description": "Paper", "score": 0.81 }
            ],
            "logoAnnotations": [
                { "description": "Reserve Bank of India", "score": 0.74 }
            ],
            "textAnnotations": [
                { "description": "RESERVE BANK OF INDIA\n500", "locale": "en" },
                { "description": "RESERVE" }
            ],
            "safeSearchAnnotation": { "adult": "VERY_UNLIKELY", "spoof": "UNLIKELY" },
            "imagePropertiesAnnotation": {
                "dominantColors": {
                    "colors": [
                        { "color": { "red": 120, "green": 98.6, "blue": 255 }, "score": 0.4 },
                        { "color": { "green": 16 }, "score": 0.1 }
                    ]
                }
            }
        })
    }

    #[test]
    fn test_single_response() {
        let raw = from_response(&sample_response()).unwrap();
        assert_eq!(raw.labels.len(), 2);
        assert_eq!(raw.labels[1].description, "Paper");
        assert_eq!(raw.logos[0].description, "Reserve Bank of India");
        assert_eq!(raw.text_detected.as_deref(), Some("RESERVE BANK OF INDIA\n500"));
        assert_eq!(raw.spoof_detection.as_deref(), Some("UNLIKELY"));
        assert_eq!(raw.dominant_colors, vec!["#7863ff", "#001000"]);
    }

    #[test]
    fn test_full_text_preferred() {
        let raw = from_response(&json!({
            "textAnnotations": [{ "description": "partial" }],
            "fullTextAnnotation": { "text": "FULL TEXT" }
        }))
        .unwrap();
        assert_eq!(raw.text_detected.as_deref(), Some("FULL TEXT"));
    }

    #[test]
    fn test_empty_response_has_no_signals() {
        let raw = from_response(&json!({})).unwrap();
        assert!(raw.labels.is_empty());
        assert!(raw.text_detected.is_none());
        assert!(raw.spoof_detection.is_none());
        assert!(raw.dominant_colors.is_empty());
    }

    #[test]
    fn test_batch_with_provider_error() {
        let doc = json!({
            "responses": [
                sample_response(),
                { "error": { "code": 3, "message": "Bad image data." } }
            ]
        });
        assert_eq!(
            from_batch(&doc).unwrap_err(),
            InvalidEvidenceError::Provider("code 3: Bad image data.".to_string())
        );
    }

    #[test]
    fn test_batch() {
        let doc = json!({ "responses": [sample_response(), {}] });
        assert_eq!(from_batch(&doc).unwrap().len(), 2);
    }
}
