use crate::error::EvaluationError;
use crate::models::EvidenceRecord;
use crate::rules::RuleSet;

use super::{miss_ratio, FactorOutcome};

/// Pattern conformance: risk is the share of identifier patterns with no
/// matching substring anywhere in the detected text.
pub fn evaluate(evidence: &EvidenceRecord, rules: &RuleSet) -> Result<FactorOutcome, EvaluationError> {
    if rules.identifier_patterns.is_empty() {
        return Ok(FactorOutcome::skipped());
    }

    let unmatched: Vec<String> = rules
        .identifier_patterns
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(&evidence.detected_text))
        .map(|(key, _)| key.clone())
        .collect();

    Ok(FactorOutcome::with_risk(
        miss_ratio(unmatched.len(), rules.identifier_patterns.len()),
        unmatched,
    ))
}
