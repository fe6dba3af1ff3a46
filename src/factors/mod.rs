//! Signal evaluators, one per risk factor.
//!
//! Each evaluator maps evidence plus rule configuration to a [`FactorOutcome`].
//! An outcome that is not applicable is skipped by the aggregator; this is how
//! both disabled checks and missing evidence are expressed.
//!
//! - [`logo`]: expected brand among label / logo detections
//! - [`generic`]: share of generic category labels among the top labels
//! - [`identifiers`]: required identifiers present in the detected text
//! - [`patterns`]: identifier patterns matched in the detected text
//! - [`spoof`]: provider spoof likelihood

pub mod generic;
pub mod identifiers;
pub mod logo;
pub mod patterns;
pub mod spoof;

use crate::error::EvaluationError;
use crate::models::EvidenceRecord;
use crate::rules::{
    RuleSet, FACTOR_GENERIC_LABELS, FACTOR_IDENTIFIERS, FACTOR_LOGO, FACTOR_PATTERNS, FACTOR_SPOOF,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorOutcome {
    pub applicable: bool,
    /// Within `[0, 1]`; meaningless when not applicable.
    pub risk: f64,
    pub findings: Vec<String>,
}

impl FactorOutcome {
    pub fn skipped() -> Self {
        Self {
            applicable: false,
            risk: 0.0,
            findings: Vec::new(),
        }
    }

    pub fn with_risk(risk: f64, findings: Vec<String>) -> Self {
        Self {
            applicable: true,
            risk: risk.clamp(0.0, 1.0),
            findings,
        }
    }
}

pub type EvaluateFn = fn(&EvidenceRecord, &RuleSet) -> Result<FactorOutcome, EvaluationError>;

/// A factor name tagged with its evaluator function.
#[derive(Clone, Copy)]
pub struct Evaluator {
    pub factor: &'static str,
    pub evaluate: EvaluateFn,
}

impl Evaluator {
    pub const fn new(factor: &'static str, evaluate: EvaluateFn) -> Self {
        Self { factor, evaluate }
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator").field("factor", &self.factor).finish()
    }
}

/// The built-in factors in evaluation order.
pub fn default_evaluators() -> Vec<Evaluator> {
    vec![
        Evaluator::new(FACTOR_LOGO, logo::evaluate),
        Evaluator::new(FACTOR_GENERIC_LABELS, generic::evaluate),
        Evaluator::new(FACTOR_IDENTIFIERS, identifiers::evaluate),
        Evaluator::new(FACTOR_PATTERNS, patterns::evaluate),
        Evaluator::new(FACTOR_SPOOF, spoof::evaluate),
    ]
}

/// Fraction of `total` that `missing` represents.
pub(crate) fn miss_ratio(missing: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        missing as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_and_names() {
        let names: Vec<&str> = default_evaluators().iter().map(|e| e.factor).collect();
        assert_eq!(
            names,
            vec!["logo", "genericLabels", "identifiers", "patterns", "spoof"]
        );
    }

    #[test]
    fn test_empty_rules_and_evidence_skip_everything() {
        let evidence = EvidenceRecord::default();
        let rules = RuleSet::default();
        for evaluator in default_evaluators() {
            let outcome = (evaluator.evaluate)(&evidence, &rules).unwrap();
            assert!(!outcome.applicable, "{} should be skipped", evaluator.factor);
        }
    }

    #[test]
    fn test_outcome_risk_clamped() {
        assert_eq!(FactorOutcome::with_risk(1.7, vec![]).risk, 1.0);
        assert_eq!(miss_ratio(1, 4), 0.25);
        assert_eq!(miss_ratio(0, 0), 0.0);
    }
}
