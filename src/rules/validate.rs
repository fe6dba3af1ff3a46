use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::Limits;
use crate::error::RuleSetValidationError;

use super::{IdentifierMatch, IdentifierPattern, LogoMatch, RuleSet, DEFAULT_GENERIC_TOP_N};

/// Validate administrator input with the default [`Limits`].
pub fn validate_rule_set(raw: &Value) -> Result<RuleSet, RuleSetValidationError> {
    validate_rule_set_with(raw, &Limits::default())
}

/// Turn a raw JSON object into a [`RuleSet`], or fail without producing one.
///
/// - every identifier pattern must compile; the error names the offending key
/// - weights must be integers in `0..=100` and are rejected, not clamped
/// - required identifiers are lowercased for case-insensitive matching
/// - unknown top-level fields and unknown weight keys are accepted
pub fn validate_rule_set_with(
    raw: &Value,
    limits: &Limits,
) -> Result<RuleSet, RuleSetValidationError> {
    let obj = raw.as_object().ok_or(RuleSetValidationError::NotAnObject)?;

    let use_logo_check: bool = field(obj, "useLogoCheck")?;
    let use_generic_labels_check: bool = field(obj, "useGenericLabelsCheck")?;

    let identifiers: Vec<String> = field(obj, "requiredIdentifiers")?;
    let required_identifiers = lowercase_terms(identifiers, "requiredIdentifiers")?;

    let identifier_match: IdentifierMatch = field(obj, "identifierMatch")?;

    let raw_patterns: BTreeMap<String, String> = field(obj, "identifierPatterns")?;
    let mut patterns = BTreeMap::new();
    for (key, pattern) in raw_patterns {
        let compiled = check_pattern(&key, &pattern, limits)?;
        patterns.insert(key, compiled);
    }

    let raw_weights: BTreeMap<String, Value> = field(obj, "weights")?;
    let mut weights = BTreeMap::new();
    for (factor, value) in raw_weights {
        match value.as_u64().filter(|w| *w <= 100) {
            Some(w) => {
                weights.insert(factor, w as u32);
            }
            None => {
                return Err(RuleSetValidationError::Weight {
                    factor,
                    value: value.to_string(),
                })
            }
        }
    }

    let logo_match: LogoMatch = field(obj, "logoMatch")?;
    if let LogoMatch::Fuzzy(threshold) = logo_match {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(RuleSetValidationError::Field {
                field: "logoMatch".to_string(),
                reason: format!("fuzzy threshold must be within (0, 1], got {}", threshold),
            });
        }
    }

    let generic_labels = field::<Option<Vec<String>>>(obj, "genericLabels")?
        .map(|labels| lowercase_terms(labels, "genericLabels"))
        .transpose()?;

    let generic_top_n = match field::<Option<u64>>(obj, "genericTopN")? {
        None => DEFAULT_GENERIC_TOP_N,
        Some(0) => {
            return Err(RuleSetValidationError::Field {
                field: "genericTopN".to_string(),
                reason: "must be at least 1".to_string(),
            })
        }
        Some(n) => n as usize,
    };

    let rules = RuleSet {
        use_logo_check,
        use_generic_labels_check,
        required_identifiers,
        identifier_match,
        identifier_patterns: patterns,
        weights,
        logo_match,
        generic_labels,
        generic_top_n,
    };

    tracing::debug!(
        identifiers = rules.required_identifiers.len(),
        patterns = rules.identifier_patterns.len(),
        weights = rules.weights.len(),
        "rule set validated"
    );

    Ok(rules)
}

/// Read an optional field; absent and `null` mean the type's default.
fn field<T: DeserializeOwned + Default>(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<T, RuleSetValidationError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| RuleSetValidationError::Field {
            field: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn lowercase_terms(
    terms: Vec<String>,
    field: &str,
) -> Result<BTreeSet<String>, RuleSetValidationError> {
    terms
        .into_iter()
        .map(|t| {
            let t = t.trim().to_lowercase();
            if t.is_empty() {
                Err(RuleSetValidationError::Field {
                    field: field.to_string(),
                    reason: "entries must not be blank".to_string(),
                })
            } else {
                Ok(t)
            }
        })
        .collect()
}

fn check_pattern(
    key: &str,
    pattern: &str,
    limits: &Limits,
) -> Result<IdentifierPattern, RuleSetValidationError> {
    let fail = |reason: String| RuleSetValidationError::Pattern {
        key: key.to_string(),
        reason,
    };

    if pattern.is_empty() {
        return Err(fail("pattern is empty".to_string()));
    }
    if pattern.len() > limits.max_pattern_len {
        return Err(fail(format!(
            "pattern is {} bytes, limit is {}",
            pattern.len(),
            limits.max_pattern_len
        )));
    }
    IdentifierPattern::new(pattern).map_err(|e| fail(e.to_string()))
}
