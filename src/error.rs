//! Error taxonomy of the scoring engine.
//!
//! - [`InvalidEvidenceError`]: malformed raw evidence; the caller rejects the analysis.
//! - [`RuleSetValidationError`]: malformed administrator rule configuration; the
//!   previously stored rule set stays in effect.
//! - [`EvaluationError`]: a rule set that never passed validation reached an
//!   evaluator. Programmer error, fatal to the request.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidEvidenceError {
    #[error("label #{index} ({description:?}) has a non-numeric score: {found}")]
    NonNumericScore {
        index: usize,
        description: String,
        found: String,
    },

    #[error("color #{index} is not a hex color: {value:?}")]
    Color { index: usize, value: String },

    #[error("evidence provider reported an error: {0}")]
    Provider(String),

    #[error("malformed evidence document: {0}")]
    Shape(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleSetValidationError {
    #[error("rule set must be a JSON object")]
    NotAnObject,

    #[error("invalid field `{field}`: {reason}")]
    Field { field: String, reason: String },

    #[error("identifier pattern `{key}` is invalid: {reason}")]
    Pattern { key: String, reason: String },

    #[error("weight `{factor}` must be an integer in 0..=100, got {value}")]
    Weight { factor: String, value: String },
}

impl RuleSetValidationError {
    /// The field, pattern key or weight key an administrator has to fix.
    pub fn offending_key(&self) -> &str {
        match self {
            RuleSetValidationError::NotAnObject => "",
            RuleSetValidationError::Field { field, .. } => field,
            RuleSetValidationError::Pattern { key, .. } => key,
            RuleSetValidationError::Weight { factor, .. } => factor,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("factor `{factor}` received an unvalidated rule set: {reason}")]
    UnvalidatedRuleSet { factor: String, reason: String },

    #[error("weight for factor `{factor}` is out of range: {weight}")]
    WeightOutOfRange { factor: String, weight: u32 },
}
