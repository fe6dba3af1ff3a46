//! Report renderers for scored images.
//!
//! - [`terminal`]: colored summary box and tables; respects `--verbose` / `--quiet`.
//! - [`pdf`]: cover page with verdict counts, then one row per image with its
//!   score, verdict badge and leading recommendation.

pub mod pdf;
pub mod terminal;

use crate::models::{ImageAssessment, Verdict};

/// Number of assessments with the given verdict.
pub fn count_verdict(assessments: &[ImageAssessment], verdict: Verdict) -> usize {
    assessments
        .iter()
        .filter(|a| a.result.verdict == verdict)
        .count()
}
