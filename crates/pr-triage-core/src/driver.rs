//! Row batch driver
//!
//! Takes a snapshot of candidate rows, claims the ones nobody is working
//! on, and runs signal collection + scoring for them in bounded batches.
//! Batches execute strictly sequentially; rows within a batch run
//! concurrently, which caps peak in-flight API traffic at the batch
//! size.
//!
//! The per-row claim/release registry is the only shared mutable state
//! in the pipeline. A row is claimed before its first fetch and released
//! into a terminal state exactly once, so a scheduler tick that overlaps
//! a still-running previous tick can never evaluate the same row twice.

use crate::collector::collect_signals;
use crate::score::{evaluate, Score, ScoreOutcome};
use crate::signals::PullRequestRef;
use async_trait::async_trait;
use futures::future::join_all;
use gh_client::GitHubClient;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Rows evaluated concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// One candidate row from the listing snapshot.
///
/// `pr_number` is the raw identifier as listed; the driver parses it and
/// ignores rows it cannot parse. `draft` is the listing-level draft
/// flag, which rules a row out before any per-PR fetch is spent on it.
#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub pr_number: String,
    pub title: String,
    pub draft: bool,
}

/// Per-row lifecycle flags.
///
/// A row starts with no flags. The driver claims it by setting
/// `processing`; completion always clears `processing` and sets
/// `processed` (plus `skipped` when the row was scored as
/// not-applicable). `processed` is terminal: the row is never evaluated
/// again for the lifetime of the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowState {
    pub processing: bool,
    pub processed: bool,
    pub skipped: bool,
    pub draft: bool,
}

#[derive(Debug, Default)]
struct RowRegistry {
    rows: HashMap<u64, RowState>,
}

impl RowRegistry {
    /// Claim a row for evaluation. Fails when the row is already in
    /// flight or terminal — the de-duplication invariant.
    fn try_claim(&mut self, number: u64) -> bool {
        let state = self.rows.entry(number).or_default();
        if state.processing || state.processed {
            return false;
        }
        state.processing = true;
        true
    }

    /// Terminal transition for a claimed row.
    fn complete(&mut self, number: u64, skipped: bool) {
        let state = self.rows.entry(number).or_default();
        state.processing = false;
        state.processed = true;
        state.skipped = skipped;
    }

    /// Terminal transition for a listing-level draft, recorded without
    /// ever claiming the row. Fails if the row is already spoken for.
    fn mark_draft(&mut self, number: u64) -> bool {
        let state = self.rows.entry(number).or_default();
        if state.processing || state.processed {
            return false;
        }
        state.draft = true;
        state.skipped = true;
        state.processed = true;
        true
    }

    fn is_open(&self, number: u64) -> bool {
        self.rows
            .get(&number)
            .map_or(true, |state| !state.processing && !state.processed)
    }

    fn state(&self, number: u64) -> Option<RowState> {
        self.rows.get(&number).copied()
    }
}

/// Supplies the candidate-row snapshot the driver works from.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn candidate_rows(&self) -> anyhow::Result<Vec<CandidateRow>>;
}

/// Applies a computed score to a row.
///
/// Implementations must be idempotent for the same row and score; the
/// driver additionally guarantees at most one `paint` call per row per
/// registry lifetime via the `processed` flag.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn paint(&self, row: &CandidateRow, pr_number: u64, score: &Score)
        -> anyhow::Result<()>;
}

/// Counters for one driver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows in the snapshot
    pub candidates: usize,
    /// Rows with an unparsable PR identifier
    pub invalid: usize,
    /// Rows ruled out as drafts before any fetch
    pub drafts: usize,
    /// Rows scored and handed to the sink
    pub painted: usize,
    /// Rows evaluated and excluded
    pub skipped: usize,
    /// Rows whose evaluation or annotation failed (still terminal)
    pub failed: usize,
}

enum RowOutcome {
    NotClaimed,
    Painted,
    Skipped,
    Failed,
}

/// Drives scoring over candidate-row snapshots.
///
/// Owns the row registry, so one driver instance must live as long as
/// the scan session: feeding successive snapshots to the same driver is
/// what makes already-processed rows free.
pub struct BatchDriver {
    client: Arc<dyn GitHubClient>,
    sink: Arc<dyn AnnotationSink>,
    registry: Mutex<RowRegistry>,
    owner: String,
    repo: String,
    viewer_login: Option<String>,
    batch_size: usize,
}

impl BatchDriver {
    pub fn new(
        client: Arc<dyn GitHubClient>,
        sink: Arc<dyn AnnotationSink>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            client,
            sink,
            registry: Mutex::new(RowRegistry::default()),
            owner: owner.into(),
            repo: repo.into(),
            viewer_login: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the authenticated user's login, enabling the
    /// own-review exclusion.
    pub fn with_viewer_login(mut self, login: impl Into<String>) -> Self {
        self.viewer_login = Some(login.into());
        self
    }

    /// Override the batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Current lifecycle flags for a row, if the driver has seen it.
    pub fn row_state(&self, pr_number: u64) -> Option<RowState> {
        self.registry.lock().unwrap().state(pr_number)
    }

    /// Evaluate one snapshot of candidate rows.
    ///
    /// Safe to call again while a previous call is still in flight; the
    /// registry's claim discipline keeps every row single-owner.
    pub async fn run(&self, rows: &[CandidateRow]) -> RunStats {
        let mut stats = RunStats {
            candidates: rows.len(),
            ..Default::default()
        };

        // Partition the snapshot before spending any network calls:
        // unparsable identifiers are dropped, listing-level drafts go
        // terminal immediately, and rows already claimed or done are
        // left alone.
        let mut eligible: Vec<(u64, &CandidateRow)> = Vec::new();
        {
            let mut registry = self.registry.lock().unwrap();
            for row in rows {
                let Some(number) = PullRequestRef::parse_number(&row.pr_number) else {
                    debug!("Ignoring row with unparsable PR identifier {:?}", row.pr_number);
                    stats.invalid += 1;
                    continue;
                };

                if row.draft {
                    if registry.mark_draft(number) {
                        debug!("PR #{} is a draft per the listing; no fetches spent", number);
                        stats.drafts += 1;
                    }
                    continue;
                }

                if registry.is_open(number) {
                    eligible.push((number, row));
                }
            }
        }

        if eligible.is_empty() {
            debug!("No eligible rows in snapshot of {}", rows.len());
            return stats;
        }

        info!(
            "Scoring {} of {} rows for {}/{} in batches of {}",
            eligible.len(),
            rows.len(),
            self.owner,
            self.repo,
            self.batch_size
        );

        for batch in eligible.chunks(self.batch_size) {
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|(number, row)| self.process_row(*number, row)),
            )
            .await;

            for outcome in outcomes {
                match outcome {
                    RowOutcome::NotClaimed => {}
                    RowOutcome::Painted => stats.painted += 1,
                    RowOutcome::Skipped => stats.skipped += 1,
                    RowOutcome::Failed => stats.failed += 1,
                }
            }
        }

        stats
    }

    async fn process_row(&self, number: u64, row: &CandidateRow) -> RowOutcome {
        // Claim-before-fetch: losing the claim means another invocation
        // already owns this row.
        if !self.registry.lock().unwrap().try_claim(number) {
            return RowOutcome::NotClaimed;
        }

        let pr = PullRequestRef::new(self.owner.clone(), self.repo.clone(), number);
        let signals =
            collect_signals(self.client.as_ref(), &pr, self.viewer_login.as_deref()).await;

        match evaluate(&signals) {
            ScoreOutcome::Excluded(reason) => {
                debug!("PR #{} excluded from scoring: {:?}", number, reason);
                self.registry.lock().unwrap().complete(number, true);
                RowOutcome::Skipped
            }
            ScoreOutcome::Scored(score) => {
                debug!(
                    "PR #{} scored {} ({} deductions)",
                    number,
                    score.value,
                    score.deductions.len()
                );
                let painted = self.sink.paint(row, number, &score).await;
                self.registry.lock().unwrap().complete(number, false);
                match painted {
                    Ok(()) => RowOutcome::Painted,
                    Err(e) => {
                        // Terminal anyway: a row that failed once is
                        // assumed to fail again this session.
                        warn!("Annotation failed for PR #{}: {}", number, e);
                        RowOutcome::Failed
                    }
                }
            }
        }
    }
}
