//! Scoring aggregator.
//!
//! Runs every evaluator, keeps the applicable outcomes with their weights and
//! folds them into one composite score:
//!
//! ```text
//! composite_risk  = Σ(risk_i × weight_i) / Σ(weight_i)
//! composite_score = 1 − composite_risk
//! ```
//!
//! The score is rounded to nine decimal places before it is classified, so a
//! composite that lands on a threshold is not pushed below it by float error.
//!
//! With nothing applicable (or every applicable weight at zero) the result is
//! undetermined: score 0.5, verdict suspicious.

use serde::Deserialize;

use crate::error::EvaluationError;
use crate::factors::{default_evaluators, Evaluator};
use crate::models::{EvidenceRecord, FactorContribution, ScoreResult, Verdict};
use crate::recommend;
use crate::rules::RuleSet;

/// Score reported when no evidence could be weighed.
pub const UNDETERMINED_SCORE: f64 = 0.5;

/// Composite scores are rounded to multiples of `1 / SCORE_SCALE`.
const SCORE_SCALE: f64 = 1e9;

/// Tunable points of the aggregator. Defaults are the fixed design values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// `score >= authentic_threshold` → authentic.
    pub authentic_threshold: f64,
    /// `score >= suspicious_threshold` → suspicious, below → fake.
    pub suspicious_threshold: f64,
    /// Weight of an applicable factor with no entry in the rule set's weights.
    pub default_weight: u32,
    /// Factors with risk above this produce a recommendation.
    pub recommendation_risk: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            authentic_threshold: 0.75,
            suspicious_threshold: 0.40,
            default_weight: 25,
            recommendation_risk: 0.3,
        }
    }
}

/// Bucket a composite score. Boundaries belong to the higher-confidence bucket.
pub fn classify(score: f64, policy: &ScoringPolicy) -> Verdict {
    if score >= policy.authentic_threshold {
        Verdict::Authentic
    } else if score >= policy.suspicious_threshold {
        Verdict::Suspicious
    } else {
        Verdict::Fake
    }
}

/// Score evidence with the built-in evaluators and default policy.
pub fn score(evidence: &EvidenceRecord, rules: &RuleSet) -> Result<ScoreResult, EvaluationError> {
    score_with(evidence, rules, &ScoringPolicy::default())
}

/// Score evidence with the built-in evaluators and a custom policy.
pub fn score_with(
    evidence: &EvidenceRecord,
    rules: &RuleSet,
    policy: &ScoringPolicy,
) -> Result<ScoreResult, EvaluationError> {
    aggregate(evidence, rules, &default_evaluators(), policy)
}

/// Run `factors` in order and combine their applicable outcomes.
pub fn aggregate(
    evidence: &EvidenceRecord,
    rules: &RuleSet,
    factors: &[Evaluator],
    policy: &ScoringPolicy,
) -> Result<ScoreResult, EvaluationError> {
    for factor in rules.weights.keys() {
        if !factors.iter().any(|e| e.factor == factor.as_str()) {
            tracing::debug!(factor = %factor, "weight has no evaluator, ignored");
        }
    }

    let mut applied: Vec<(&'static str, f64, u32, Vec<String>)> = Vec::new();
    for evaluator in factors {
        let outcome = (evaluator.evaluate)(evidence, rules).map_err(|e| {
            tracing::error!(factor = evaluator.factor, error = %e, "factor evaluation failed");
            e
        })?;

        tracing::debug!(
            factor = evaluator.factor,
            applicable = outcome.applicable,
            risk = outcome.risk,
            "factor evaluated"
        );

        if !outcome.applicable {
            continue;
        }

        let weight = weight_for(rules, evaluator.factor, policy)?;
        applied.push((evaluator.factor, outcome.risk, weight, outcome.findings));
    }

    let weight_sum: u64 = applied.iter().map(|(_, _, w, _)| u64::from(*w)).sum();

    if weight_sum == 0 {
        let mut result = ScoreResult {
            composite_score: UNDETERMINED_SCORE,
            verdict: Verdict::Suspicious,
            factor_contributions: applied
                .into_iter()
                .map(|(factor, risk, weight, findings)| FactorContribution {
                    factor: factor.to_string(),
                    risk,
                    weight,
                    weighted_contribution: 0.0,
                    findings,
                })
                .collect(),
            recommendations: Vec::new(),
        };
        result.recommendations = recommend::generate(&result, policy);
        return Ok(result);
    }

    let total = weight_sum as f64;

    // Sorted before summing so the total does not depend on evaluation order.
    let mut terms: Vec<f64> = applied
        .iter()
        .map(|(_, risk, weight, _)| risk * f64::from(*weight))
        .collect();
    terms.sort_by(f64::total_cmp);
    let composite_risk = (terms.iter().sum::<f64>() / total).clamp(0.0, 1.0);
    let composite_score = round_score(1.0 - composite_risk);

    let factor_contributions = applied
        .into_iter()
        .map(|(factor, risk, weight, findings)| FactorContribution {
            factor: factor.to_string(),
            risk,
            weight,
            weighted_contribution: risk * f64::from(weight) / total,
            findings,
        })
        .collect();

    let mut result = ScoreResult {
        composite_score,
        verdict: classify(composite_score, policy),
        factor_contributions,
        recommendations: Vec::new(),
    };
    result.recommendations = recommend::generate(&result, policy);

    tracing::debug!(
        score = result.composite_score,
        verdict = %result.verdict,
        "evidence scored"
    );

    Ok(result)
}

fn round_score(score: f64) -> f64 {
    (score * SCORE_SCALE).round() / SCORE_SCALE
}

fn weight_for(rules: &RuleSet, factor: &str, policy: &ScoringPolicy) -> Result<u32, EvaluationError> {
    let weight = rules.weights.get(factor).copied().unwrap_or(policy.default_weight);
    if weight > 100 {
        let err = EvaluationError::WeightOutOfRange {
            factor: factor.to_string(),
            weight,
        };
        tracing::error!(error = %err, "factor evaluation failed");
        return Err(err);
    }
    Ok(weight)
}
