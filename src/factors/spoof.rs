use crate::error::EvaluationError;
use crate::models::EvidenceRecord;
use crate::rules::RuleSet;

use super::FactorOutcome;

/// Spoof likelihood mapped to risk; `Unknown` is no signal, not a fake.
pub fn evaluate(evidence: &EvidenceRecord, _rules: &RuleSet) -> Result<FactorOutcome, EvaluationError> {
    Ok(match evidence.spoof_likelihood.risk() {
        Some(risk) => FactorOutcome::with_risk(risk, vec![evidence.spoof_likelihood.to_string()]),
        None => FactorOutcome::skipped(),
    })
}
