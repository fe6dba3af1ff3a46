use crate::error::EvaluationError;
use crate::models::EvidenceRecord;
use crate::rules::{IdentifierMatch, RuleSet, FACTOR_IDENTIFIERS};

use super::{miss_ratio, FactorOutcome};

/// Words skipped when reading initialisms off a line of text.
const STOP_WORDS: &[&str] = &["of", "the", "and", "for", "de", "&"];

/// Required identifiers: risk is the share of identifiers that do not occur,
/// case-insensitively, in the detected text.
///
/// An identifier occurs when it is a substring of the text. Under
/// [`IdentifierMatch::Initials`] a purely alphabetic identifier also occurs
/// when it is spelled by the initials of consecutive words on one line
/// ("rbi" in "RESERVE BANK OF INDIA").
pub fn evaluate(evidence: &EvidenceRecord, rules: &RuleSet) -> Result<FactorOutcome, EvaluationError> {
    if rules.required_identifiers.is_empty() {
        return Ok(FactorOutcome::skipped());
    }

    if let Some(bad) = rules
        .required_identifiers
        .iter()
        .find(|id| id.is_empty() || **id != id.to_lowercase())
    {
        return Err(EvaluationError::UnvalidatedRuleSet {
            factor: FACTOR_IDENTIFIERS.to_string(),
            reason: format!("identifier {:?} was not normalized", bad),
        });
    }

    let text = evidence.detected_text.to_lowercase();
    let initials = match rules.identifier_match {
        IdentifierMatch::Initials => line_initials(&text),
        IdentifierMatch::Substring => Vec::new(),
    };
    let missing: Vec<String> = rules
        .required_identifiers
        .iter()
        .filter(|id| !occurs(id, &text, &initials))
        .cloned()
        .collect();

    Ok(FactorOutcome::with_risk(
        miss_ratio(missing.len(), rules.required_identifiers.len()),
        missing,
    ))
}

fn occurs(id: &str, text: &str, initials: &[String]) -> bool {
    if text.contains(id) {
        return true;
    }
    id.len() >= 2
        && id.chars().all(|c| c.is_alphabetic())
        && initials.iter().any(|line| line.contains(id))
}

/// First letter of every non-stop word, one string per line.
fn line_initials(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.split(|c: char| !c.is_alphanumeric() && c != '&')
                .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
                .filter_map(|w| w.chars().next())
                .collect()
        })
        .collect()
}
