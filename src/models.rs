use serde::{Deserialize, Serialize};

/// One classification result from a label or logo provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub description: String,
    /// Always within `[0, 1]` once normalized.
    pub score: f64,
}

/// Ordinal spoof / manipulation likelihood reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpoofLikelihood {
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
    Unknown,
}

impl SpoofLikelihood {
    /// Parse a provider string. Anything unrecognized is `Unknown`, never an error.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "VERY_UNLIKELY" => SpoofLikelihood::VeryUnlikely,
            "UNLIKELY" => SpoofLikelihood::Unlikely,
            "POSSIBLE" => SpoofLikelihood::Possible,
            "LIKELY" => SpoofLikelihood::Likely,
            "VERY_LIKELY" => SpoofLikelihood::VeryLikely,
            _ => SpoofLikelihood::Unknown,
        }
    }

    /// Fixed monotonic risk mapping; `None` when there is no signal.
    pub fn risk(&self) -> Option<f64> {
        match self {
            SpoofLikelihood::VeryUnlikely => Some(0.0),
            SpoofLikelihood::Unlikely => Some(0.25),
            SpoofLikelihood::Possible => Some(0.5),
            SpoofLikelihood::Likely => Some(0.75),
            SpoofLikelihood::VeryLikely => Some(1.0),
            SpoofLikelihood::Unknown => None,
        }
    }
}

impl std::fmt::Display for SpoofLikelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpoofLikelihood::VeryUnlikely => write!(f, "VERY_UNLIKELY"),
            SpoofLikelihood::Unlikely => write!(f, "UNLIKELY"),
            SpoofLikelihood::Possible => write!(f, "POSSIBLE"),
            SpoofLikelihood::Likely => write!(f, "LIKELY"),
            SpoofLikelihood::VeryLikely => write!(f, "VERY_LIKELY"),
            SpoofLikelihood::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Canonical per-image evidence. Produced by [`crate::evidence::normalize`]
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    /// Provider rank order, not necessarily sorted by score.
    pub labels: Vec<Label>,
    pub logos: Vec<Label>,
    /// Line endings normalized to `\n`; case preserved.
    pub detected_text: String,
    /// Lowercase `#rrggbb`.
    pub dominant_colors: Vec<String>,
    pub spoof_likelihood: SpoofLikelihood,
    /// Expected brand / logo term supplied by the product catalog.
    pub brand: Option<String>,
}

impl Default for EvidenceRecord {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            logos: Vec::new(),
            detected_text: String::new(),
            dominant_colors: Vec::new(),
            spoof_likelihood: SpoofLikelihood::Unknown,
            brand: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Authentic,
    Suspicious,
    Fake,
}

impl Verdict {
    /// Higher is worse; used for `--fail-on` comparisons.
    pub fn severity(&self) -> u8 {
        match self {
            Verdict::Authentic => 0,
            Verdict::Suspicious => 1,
            Verdict::Fake => 2,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Authentic => write!(f, "authentic"),
            Verdict::Suspicious => write!(f, "suspicious"),
            Verdict::Fake => write!(f, "fake"),
        }
    }
}

/// One evaluated factor's share of the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub factor: String,
    pub risk: f64,
    pub weight: u32,
    /// `risk * weight / sum(weights)`; all contributions add up to the composite risk.
    pub weighted_contribution: f64,
    /// Items behind the risk: missing identifiers, unmatched pattern keys, ...
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub composite_score: f64,
    pub verdict: Verdict,
    /// Only factors that were applicable, in evaluation order.
    pub factor_contributions: Vec<FactorContribution>,
    pub recommendations: Vec<String>,
}

/// A scored image as shown in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAssessment {
    pub source: String,
    pub result: ScoreResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoof_parse() {
        assert_eq!(SpoofLikelihood::parse("VERY_LIKELY"), SpoofLikelihood::VeryLikely);
        assert_eq!(SpoofLikelihood::parse(" unlikely "), SpoofLikelihood::Unlikely);
        assert_eq!(SpoofLikelihood::parse("very likely"), SpoofLikelihood::VeryLikely);
        assert_eq!(SpoofLikelihood::parse("MAYBE"), SpoofLikelihood::Unknown);
        assert_eq!(SpoofLikelihood::parse(""), SpoofLikelihood::Unknown);
    }

    #[test]
    fn test_spoof_risk_is_monotonic() {
        let levels = [
            SpoofLikelihood::VeryUnlikely,
            SpoofLikelihood::Unlikely,
            SpoofLikelihood::Possible,
            SpoofLikelihood::Likely,
            SpoofLikelihood::VeryLikely,
        ];
        let risks: Vec<f64> = levels.iter().filter_map(|l| l.risk()).collect();
        assert_eq!(risks, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(SpoofLikelihood::Unknown.risk(), None);
    }

    #[test]
    fn test_verdict_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Fake).unwrap(), "\"fake\"");
        assert!(Verdict::Fake.severity() > Verdict::Suspicious.severity());
    }
}
