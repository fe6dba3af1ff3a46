use serde::Deserialize;
use serde_json::Value;

use crate::config::Limits;
use crate::error::InvalidEvidenceError;
use crate::models::{EvidenceRecord, Label, SpoofLikelihood};

/// A label as a provider hands it over. The score stays untyped until
/// normalization so a non-numeric value can be reported instead of dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub description: String,
    #[serde(default)]
    pub score: Value,
}

impl RawLabel {
    pub fn new(description: impl Into<String>, score: impl Into<Value>) -> Self {
        Self {
            description: description.into(),
            score: score.into(),
        }
    }
}

/// Raw evidence for one image, in the canonical document shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvidence {
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default)]
    pub logos: Vec<RawLabel>,
    #[serde(default)]
    pub text_detected: Option<String>,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default)]
    pub spoof_detection: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl RawEvidence {
    /// Use `brand` when the evidence names none, or only a blank one.
    pub fn fill_brand(&mut self, brand: Option<&str>) {
        let named = self.brand.as_deref().is_some_and(|b| !b.trim().is_empty());
        if !named {
            if let Some(brand) = brand {
                self.brand = Some(brand.to_string());
            }
        }
    }

    /// Normalize every signal, including logo detections and the brand term.
    pub fn normalize(&self, limits: &Limits) -> Result<EvidenceRecord, InvalidEvidenceError> {
        let mut record = normalize_with(
            &self.labels,
            self.text_detected.as_deref().unwrap_or(""),
            &self.dominant_colors,
            self.spoof_detection.as_deref(),
            limits,
        )?;
        record.logos = normalize_labels(&self.logos)?;
        record.brand = self
            .brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        Ok(record)
    }
}

/// Normalize raw extraction outputs with the default [`Limits`].
pub fn normalize(
    raw_labels: &[RawLabel],
    raw_text: &str,
    raw_colors: &[String],
    raw_spoof: Option<&str>,
) -> Result<EvidenceRecord, InvalidEvidenceError> {
    normalize_with(raw_labels, raw_text, raw_colors, raw_spoof, &Limits::default())
}

/// Convert raw extraction outputs into an [`EvidenceRecord`]:
///
/// - label scores are clamped to `[0, 1]`; a non-numeric score is an error
/// - detected text keeps its case, line endings become `\n`
/// - colors become lowercase `#rrggbb`
/// - an unrecognized or missing spoof flag becomes [`SpoofLikelihood::Unknown`]
pub fn normalize_with(
    raw_labels: &[RawLabel],
    raw_text: &str,
    raw_colors: &[String],
    raw_spoof: Option<&str>,
    limits: &Limits,
) -> Result<EvidenceRecord, InvalidEvidenceError> {
    let labels = normalize_labels(raw_labels)?;

    let dominant_colors = raw_colors
        .iter()
        .enumerate()
        .map(|(index, c)| {
            normalize_color(c).ok_or_else(|| InvalidEvidenceError::Color {
                index,
                value: c.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let spoof_likelihood = match raw_spoof {
        Some(flag) => {
            let parsed = SpoofLikelihood::parse(flag);
            if parsed == SpoofLikelihood::Unknown && !flag.trim().eq_ignore_ascii_case("UNKNOWN") {
                tracing::warn!(flag, "unrecognized spoof likelihood, treating as unknown");
            }
            parsed
        }
        None => SpoofLikelihood::Unknown,
    };

    Ok(EvidenceRecord {
        labels,
        logos: Vec::new(),
        detected_text: normalize_text(raw_text, limits.max_text_bytes),
        dominant_colors,
        spoof_likelihood,
        brand: None,
    })
}

fn normalize_labels(raw: &[RawLabel]) -> Result<Vec<Label>, InvalidEvidenceError> {
    raw.iter()
        .enumerate()
        .map(|(index, l)| {
            let score = match &l.score {
                Value::Number(n) => n.as_f64(),
                _ => None,
            }
            .filter(|s| s.is_finite())
            .ok_or_else(|| InvalidEvidenceError::NonNumericScore {
                index,
                description: l.description.clone(),
                found: l.score.to_string(),
            })?;

            Ok(Label {
                description: l.description.trim().to_string(),
                score: score.clamp(0.0, 1.0),
            })
        })
        .collect()
}

fn normalize_text(raw: &str, max_bytes: usize) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    if text.len() <= max_bytes {
        return text;
    }

    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    tracing::warn!(
        original_bytes = text.len(),
        kept_bytes = cut,
        "detected text truncated"
    );
    text[..cut].to_string()
}

/// `#RGB`, `RGB`, `#RRGGBB` or `RRGGBB` → `#rrggbb`.
fn normalize_color(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let hex = hex.to_ascii_lowercase();
    match hex.len() {
        6 => Some(format!("#{}", hex)),
        3 => Some(format!(
            "#{}",
            hex.chars().flat_map(|c| [c, c]).collect::<String>()
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fill_brand_replaces_missing_or_blank() {
        let mut blank = RawEvidence {
            brand: Some("   ".to_string()),
            ..RawEvidence::default()
        };
        blank.fill_brand(Some("Acme"));
        assert_eq!(blank.brand.as_deref(), Some("Acme"));

        let mut missing = RawEvidence::default();
        missing.fill_brand(Some("Acme"));
        assert_eq!(missing.brand.as_deref(), Some("Acme"));

        let mut named = RawEvidence {
            brand: Some("Globex".to_string()),
            ..RawEvidence::default()
        };
        named.fill_brand(Some("Acme"));
        assert_eq!(named.brand.as_deref(), Some("Globex"));

        let mut untouched = RawEvidence {
            brand: Some(" ".to_string()),
            ..RawEvidence::default()
        };
        untouched.fill_brand(None);
        assert_eq!(untouched.normalize(&Limits::default()).unwrap().brand, None);
    }

    #[test]
    fn test_scores_are_clamped() {
        let labels = vec![RawLabel::new("Banknote", 1.4), RawLabel::new("Paper", -0.2)];
        let record = normalize(&labels, "", &[], None).unwrap();
        assert_eq!(record.labels[0].score, 1.0);
        assert_eq!(record.labels[1].score, 0.0);
        assert_eq!(record.labels[0].description, "Banknote");
    }

    #[test]
    fn test_non_numeric_score_rejected() {
        let labels = vec![RawLabel::new("Banknote", 0.9), RawLabel::new("Paper", "high")];
        let err = normalize(&labels, "", &[], None).unwrap_err();
        assert_eq!(
            err,
            InvalidEvidenceError::NonNumericScore {
                index: 1,
                description: "Paper".to_string(),
                found: "\"high\"".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_score_rejected() {
        let raw: RawEvidence =
            serde_json::from_value(json!({ "labels": [{ "description": "Logo" }] })).unwrap();
        assert!(matches!(
            raw.normalize(&Limits::default()),
            Err(InvalidEvidenceError::NonNumericScore { index: 0, .. })
        ));
    }

    #[test]
    fn test_line_endings_normalized_case_kept() {
        let record = normalize(&[], "Reserve Bank\r\nOf India\rFIVE", &[], None).unwrap();
        assert_eq!(record.detected_text, "Reserve Bank\nOf India\nFIVE");
    }

    #[test]
    fn test_unknown_spoof_flag_is_no_signal() {
        let record = normalize(&[], "", &[], Some("SOMEWHAT")).unwrap();
        assert_eq!(record.spoof_likelihood, SpoofLikelihood::Unknown);

        let record = normalize(&[], "", &[], None).unwrap();
        assert_eq!(record.spoof_likelihood, SpoofLikelihood::Unknown);

        let record = normalize(&[], "", &[], Some("LIKELY")).unwrap();
        assert_eq!(record.spoof_likelihood, SpoofLikelihood::Likely);
    }

    #[test]
    fn test_colors() {
        let colors = vec!["#AABBCC".to_string(), "0f0".to_string()];
        let record = normalize(&[], "", &colors, None).unwrap();
        assert_eq!(record.dominant_colors, vec!["#aabbcc", "#00ff00"]);

        let bad = vec!["#abcd".to_string()];
        assert_eq!(
            normalize(&[], "", &bad, None).unwrap_err(),
            InvalidEvidenceError::Color {
                index: 0,
                value: "#abcd".to_string()
            }
        );
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let limits = Limits {
            max_text_bytes: 4,
            ..Limits::default()
        };
        // 'é' is two bytes; byte 4 falls inside the second one.
        let record = normalize_with(&[], "aéé", &[], None, &limits).unwrap();
        assert_eq!(record.detected_text, "aé");
    }

    #[test]
    fn test_canonical_document() {
        let raw: RawEvidence = serde_json::from_value(json!({
            "labels": [{ "description": "Currency", "score": 0.97 }],
            "logos": [{ "description": "Reserve Bank of India", "score": 0.8 }],
            "textDetected": "RBI 500",
            "dominantColors": ["#112233"],
            "spoofDetection": "VERY_UNLIKELY",
            "brand": "  Reserve Bank of India "
        }))
        .unwrap();

        let record = raw.normalize(&Limits::default()).unwrap();
        assert_eq!(record.labels.len(), 1);
        assert_eq!(record.logos[0].description, "Reserve Bank of India");
        assert_eq!(record.detected_text, "RBI 500");
        assert_eq!(record.spoof_likelihood, SpoofLikelihood::VeryUnlikely);
        assert_eq!(record.brand.as_deref(), Some("Reserve Bank of India"));
    }

    #[test]
    fn test_blank_brand_is_absent() {
        let raw = RawEvidence {
            brand: Some("   ".to_string()),
            ..RawEvidence::default()
        };
        assert_eq!(raw.normalize(&Limits::default()).unwrap().brand, None);
    }
}
