//! `authenticity-checkr`: score product image evidence against per-product rules.
//!
//! # Flow
//! 1. Normalize raw provider output into an [`EvidenceRecord`] ([`evidence`]).
//! 2. Validate the administrator's rule configuration into a [`RuleSet`] ([`rules`]).
//! 3. Evaluate each risk factor ([`factors`]).
//! 4. Combine weighted risks into a composite score and verdict ([`engine`]).
//! 5. Explain the verdict ([`recommend`]).
//!
//! Every operation is a pure function of its inputs: no shared state, no I/O.
//! The [`source`], [`config`] and [`report`] modules serve the command-line tool.

pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod factors;
pub mod models;
pub mod recommend;
pub mod report;
pub mod rules;
pub mod source;

pub use engine::{aggregate, classify, score, score_with, ScoringPolicy};
pub use error::{EvaluationError, InvalidEvidenceError, RuleSetValidationError};
pub use evidence::{normalize, RawEvidence, RawLabel};
pub use models::{EvidenceRecord, FactorContribution, Label, ScoreResult, SpoofLikelihood, Verdict};
pub use rules::{validate_rule_set, IdentifierMatch, IdentifierPattern, LogoMatch, RuleSet};
