use crate::error::EvaluationError;
use crate::models::{EvidenceRecord, Label};
use crate::rules::{RuleSet, FACTOR_GENERIC_LABELS};

use super::{miss_ratio, FactorOutcome};

/// Generic-label share: the fraction of the top-N labels (by score, ties in
/// provider order) that are generic category terms rather than the product.
/// Skipped when the check is off or the provider returned no labels.
pub fn evaluate(evidence: &EvidenceRecord, rules: &RuleSet) -> Result<FactorOutcome, EvaluationError> {
    if !rules.use_generic_labels_check {
        return Ok(FactorOutcome::skipped());
    }
    if rules.generic_top_n == 0 {
        return Err(EvaluationError::UnvalidatedRuleSet {
            factor: FACTOR_GENERIC_LABELS.to_string(),
            reason: "genericTopN is zero".to_string(),
        });
    }
    if evidence.labels.is_empty() {
        return Ok(FactorOutcome::skipped());
    }

    let top = top_labels(&evidence.labels, rules.generic_top_n);
    let generic: Vec<String> = top
        .iter()
        .filter(|l| rules.is_generic_label(&l.description))
        .map(|l| l.description.clone())
        .collect();

    Ok(FactorOutcome::with_risk(
        miss_ratio(generic.len(), top.len()),
        generic,
    ))
}

fn top_labels(labels: &[Label], n: usize) -> Vec<&Label> {
    let mut ranked: Vec<&Label> = labels.iter().collect();
    // stable: equal scores keep provider order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[(&str, f64)]) -> EvidenceRecord {
        EvidenceRecord {
            labels: items
                .iter()
                .map(|(d, s)| Label {
                    description: d.to_string(),
                    score: *s,
                })
                .collect(),
            ..EvidenceRecord::default()
        }
    }

    fn enabled(top_n: usize) -> RuleSet {
        RuleSet {
            use_generic_labels_check: true,
            generic_top_n: top_n,
            ..RuleSet::default()
        }
    }

    #[test]
    fn test_disabled_or_no_labels_skipped() {
        let ev = labels(&[("Paper", 0.9)]);
        assert!(!evaluate(&ev, &RuleSet::default()).unwrap().applicable);
        assert!(!evaluate(&EvidenceRecord::default(), &enabled(10)).unwrap().applicable);
    }

    #[test]
    fn test_mostly_generic_is_risky() {
        let ev = labels(&[
            ("Paper", 0.95),
            ("Document", 0.9),
            ("Banknote", 0.8),
            ("Font", 0.7),
        ]);
        let outcome = evaluate(&ev, &enabled(10)).unwrap();
        assert_eq!(outcome.risk, 0.75);
        assert_eq!(outcome.findings, vec!["Paper", "Document", "Font"]);
    }

    #[test]
    fn test_product_specific_is_safe() {
        let ev = labels(&[("Banknote", 0.97), ("Currency", 0.93), ("Cash", 0.9)]);
        assert_eq!(evaluate(&ev, &enabled(10)).unwrap().risk, 0.0);
    }

    #[test]
    fn test_top_n_by_score_not_insertion_order() {
        // Provider order puts the generic label first, but its score is lowest.
        let ev = labels(&[("Paper", 0.5), ("Banknote", 0.9), ("Currency", 0.8)]);
        assert_eq!(evaluate(&ev, &enabled(2)).unwrap().risk, 0.0);
        assert_eq!(evaluate(&ev, &enabled(3)).unwrap().risk, 1.0 / 3.0);
    }

    #[test]
    fn test_zero_top_n_is_unvalidated() {
        let ev = labels(&[("Paper", 0.5)]);
        assert!(evaluate(&ev, &enabled(0)).is_err());
    }
}
