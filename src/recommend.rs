//! Human-readable explanations derived from a [`ScoreResult`].

use crate::engine::ScoringPolicy;
use crate::models::{FactorContribution, ScoreResult, Verdict};
use crate::rules::{
    FACTOR_GENERIC_LABELS, FACTOR_IDENTIFIERS, FACTOR_LOGO, FACTOR_PATTERNS, FACTOR_SPOOF,
};

pub const AUTHENTIC_MESSAGE: &str = "Item appears authentic";
pub const INSUFFICIENT_EVIDENCE_MESSAGE: &str =
    "Insufficient evidence to determine authenticity; inspect the item manually";

/// Build recommendations from a result. The `recommendations` field of the
/// input is ignored; output depends on nothing else, so identical input gives
/// identical output.
pub fn generate(result: &ScoreResult, policy: &ScoringPolicy) -> Vec<String> {
    let weighed = result.factor_contributions.iter().any(|c| c.weight > 0);
    if !weighed {
        return vec![INSUFFICIENT_EVIDENCE_MESSAGE.to_string()];
    }

    let fired: Vec<&FactorContribution> = result
        .factor_contributions
        .iter()
        .filter(|c| c.risk > policy.recommendation_risk)
        .collect();

    if fired.is_empty() {
        return match result.verdict {
            Verdict::Authentic => vec![AUTHENTIC_MESSAGE.to_string()],
            _ => vec![format!(
                "Overall confidence {:.0}% is below the authenticity threshold; manual review recommended",
                result.composite_score * 100.0
            )],
        };
    }

    fired.into_iter().flat_map(messages_for).collect()
}

fn messages_for(c: &FactorContribution) -> Vec<String> {
    match c.factor.as_str() {
        FACTOR_LOGO => vec![match c.findings.first() {
            Some(brand) => format!("Brand logo not detected: expected \"{}\"", brand),
            None => "Brand logo not detected".to_string(),
        }],
        FACTOR_GENERIC_LABELS => vec![format!(
            "Image is classified mostly as generic content ({}); it may be a copy rather than the product",
            c.findings.join(", ")
        )],
        FACTOR_IDENTIFIERS => c
            .findings
            .iter()
            .map(|id| format!("Missing required identifier: {}", id.to_uppercase()))
            .collect(),
        FACTOR_PATTERNS => c
            .findings
            .iter()
            .map(|key| format!("No text matches the expected format for identifier: {}", key))
            .collect(),
        FACTOR_SPOOF => vec![format!(
            "Image shows signs of spoofing or manipulation (likelihood: {})",
            c.findings.first().map(String::as_str).unwrap_or("unknown")
        )],
        other => vec![format!(
            "Risk factor \"{}\" indicates a possible counterfeit ({:.0}% risk)",
            other,
            c.risk * 100.0
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(factor: &str, risk: f64, findings: &[&str]) -> FactorContribution {
        FactorContribution {
            factor: factor.to_string(),
            risk,
            weight: 25,
            weighted_contribution: 0.0,
            findings: findings.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn result(score: f64, verdict: Verdict, contributions: Vec<FactorContribution>) -> ScoreResult {
        ScoreResult {
            composite_score: score,
            verdict,
            factor_contributions: contributions,
            recommendations: vec!["stale".to_string()],
        }
    }

    #[test]
    fn test_authentic_single_message() {
        let r = result(
            0.9,
            Verdict::Authentic,
            vec![contribution("spoof", 0.25, &["UNLIKELY"]), contribution("logo", 0.0, &["Acme"])],
        );
        assert_eq!(generate(&r, &ScoringPolicy::default()), vec!["Item appears authentic"]);
    }

    #[test]
    fn test_per_factor_messages_in_order() {
        let r = result(
            0.2,
            Verdict::Fake,
            vec![
                contribution("logo", 1.0, &["Acme"]),
                contribution("genericLabels", 0.75, &["Paper", "Document"]),
                contribution("identifiers", 0.5, &["serial-no", "rbi"]),
                contribution("patterns", 1.0, &["serial"]),
                contribution("spoof", 0.75, &["LIKELY"]),
                contribution("hologram", 0.6, &[]),
            ],
        );
        assert_eq!(
            generate(&r, &ScoringPolicy::default()),
            vec![
                "Brand logo not detected: expected \"Acme\"",
                "Image is classified mostly as generic content (Paper, Document); it may be a copy rather than the product",
                "Missing required identifier: SERIAL-NO",
                "Missing required identifier: RBI",
                "No text matches the expected format for identifier: serial",
                "Image shows signs of spoofing or manipulation (likelihood: LIKELY)",
                "Risk factor \"hologram\" indicates a possible counterfeit (60% risk)",
            ]
        );
    }

    #[test]
    fn test_risk_at_threshold_does_not_fire() {
        let r = result(0.7, Verdict::Suspicious, vec![contribution("spoof", 0.3, &["UNLIKELY"])]);
        assert_eq!(
            generate(&r, &ScoringPolicy::default()),
            vec!["Overall confidence 70% is below the authenticity threshold; manual review recommended"]
        );
    }

    #[test]
    fn test_authentic_with_fired_factor_explains_it() {
        let r = result(0.8, Verdict::Authentic, vec![contribution("patterns", 0.5, &["serial"])]);
        assert_eq!(
            generate(&r, &ScoringPolicy::default()),
            vec!["No text matches the expected format for identifier: serial"]
        );
    }

    #[test]
    fn test_no_weighed_factor_is_insufficient() {
        let r = result(0.5, Verdict::Suspicious, vec![]);
        assert_eq!(
            generate(&r, &ScoringPolicy::default()),
            vec![INSUFFICIENT_EVIDENCE_MESSAGE]
        );
    }
}
