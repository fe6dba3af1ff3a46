use crate::error::EvaluationError;
use crate::models::EvidenceRecord;
use crate::rules::{LogoMatch, RuleSet, FACTOR_LOGO};

use super::FactorOutcome;

/// Logo presence: risk 0 when a label or logo detection matches the expected
/// brand, 1 otherwise. Skipped when the check is off or no brand term is known.
pub fn evaluate(evidence: &EvidenceRecord, rules: &RuleSet) -> Result<FactorOutcome, EvaluationError> {
    if !rules.use_logo_check {
        return Ok(FactorOutcome::skipped());
    }

    let Some(brand) = evidence.brand.as_deref() else {
        tracing::debug!("logo check enabled but no brand term supplied");
        return Ok(FactorOutcome::skipped());
    };

    if let LogoMatch::Fuzzy(threshold) = rules.logo_match {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(EvaluationError::UnvalidatedRuleSet {
                factor: FACTOR_LOGO.to_string(),
                reason: format!("fuzzy threshold {} outside (0, 1]", threshold),
            });
        }
    }

    let matched = evidence
        .labels
        .iter()
        .chain(&evidence.logos)
        .find(|l| rules.logo_match.matches(&l.description, brand));

    Ok(match matched {
        Some(label) => FactorOutcome::with_risk(0.0, vec![label.description.clone()]),
        None => FactorOutcome::with_risk(1.0, vec![brand.to_string()]),
    })
}
