//! PR reviewability scoring pipeline
//!
//! For each candidate pull request this crate fetches several
//! independent signals from the forge (metadata, CI check runs or the
//! legacy combined status, reviews), fuses them into a bounded 0–10
//! score via a deterministic rule table, and reports each result to an
//! annotation sink exactly once.
//!
//! # Pipeline
//!
//! ```text
//! snapshot ──► BatchDriver ──► collect_signals ──► evaluate ──► AnnotationSink
//!  (rows)       claim/release    metadata → CI →     rule table     paint once
//!               registry         reviews, per-       + clamp
//!                                endpoint degrade
//! ```
//!
//! The driver owns the claim/release registry, so rows are evaluated at
//! most once per session even when scheduler ticks overlap. Scoring is
//! pure; collection is best-effort with per-endpoint degradation to
//! `Signal::Unknown`.

pub mod collector;
pub mod description;
pub mod driver;
pub mod score;
pub mod signals;

pub use collector::collect_signals;
pub use description::classify_description;
pub use driver::{
    AnnotationSink, BatchDriver, CandidateRow, RowSource, RowState, RunStats, DEFAULT_BATCH_SIZE,
};
pub use score::{evaluate, Deduction, ExclusionReason, Score, ScoreOutcome, BASE_SCORE};
pub use signals::{DescriptionStatus, PullRequestRef, ReviewabilitySignals, Signal};
