//! Reviewability scoring rules
//!
//! A deterministic, pure mapping from fused signals to a 0–10 score.
//! Exclusions (drafts, PRs the viewer already reviewed) short-circuit
//! before any deduction is computed; everything else starts at 10 and
//! loses points per the rule table, with unknown fields deducting
//! nothing.

use crate::signals::{DescriptionStatus, ReviewabilitySignals, Signal};
use serde::Serialize;

/// Base score before any deduction
pub const BASE_SCORE: i32 = 10;

/// One applied deduction, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deduction {
    /// Short rule name (e.g. "merge-conflicts")
    pub label: &'static str,
    /// Points removed, always negative
    pub delta: i32,
}

/// A computed reviewability score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Final value, clamped to [0, 10]
    pub value: u8,
    /// Deductions in the order they were applied
    pub deductions: Vec<Deduction>,
}

/// Why a PR was excluded from scoring entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExclusionReason {
    /// Draft PRs are not up for review
    Draft,
    /// The viewer already has a live review on the current head commit
    ViewerHasActiveReview,
}

/// Result of evaluating one PR's signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScoreOutcome {
    /// Paint this score onto the row
    Scored(Score),
    /// Do not paint; mark the row skipped
    Excluded(ExclusionReason),
}

/// Evaluate fused signals into a score or an exclusion.
///
/// Deterministic and side-effect free; the same signals always produce
/// the same outcome, deduction order included.
pub fn evaluate(signals: &ReviewabilitySignals) -> ScoreOutcome {
    if signals.is_draft == Signal::Known(true) {
        return ScoreOutcome::Excluded(ExclusionReason::Draft);
    }
    if signals.viewer_has_active_review {
        return ScoreOutcome::Excluded(ExclusionReason::ViewerHasActiveReview);
    }

    let mut deductions = Vec::new();

    // Single highest matching band for the diff size
    if let Some(files) = signals.changed_file_count.get() {
        if files >= 60 {
            deductions.push(Deduction { label: "changed-files", delta: -3 });
        } else if files >= 40 {
            deductions.push(Deduction { label: "changed-files", delta: -2 });
        } else if files >= 20 {
            deductions.push(Deduction { label: "changed-files", delta: -1 });
        }
    }

    if signals.has_merge_conflicts == Signal::Known(true) {
        deductions.push(Deduction { label: "merge-conflicts", delta: -3 });
    }

    // Single band for the description as well
    match signals.description.get() {
        Some(DescriptionStatus::Empty) => {
            deductions.push(Deduction { label: "empty-description", delta: -2 });
        }
        Some(DescriptionStatus::BoilerplateOnly) => {
            deductions.push(Deduction { label: "boilerplate-description", delta: -1 });
        }
        Some(DescriptionStatus::Full) | None => {}
    }

    if signals.ci_failed == Signal::Known(true) {
        deductions.push(Deduction { label: "ci-failed", delta: -3 });
    }

    if let Some(count) = signals.requested_reviewer_count.get() {
        if count <= 3 {
            deductions.push(Deduction { label: "few-reviewers", delta: -1 });
        }
    }

    let raw: i32 = BASE_SCORE + deductions.iter().map(|d| d.delta).sum::<i32>();
    let value = raw.clamp(0, 10) as u8;

    ScoreOutcome::Scored(Score { value, deductions })
}
