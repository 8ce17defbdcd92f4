//! Signal collection
//!
//! Resolves the evidence for one PR from up to four endpoints: metadata,
//! check runs, the legacy combined status, and reviews. Collection is
//! best-effort all the way down — an endpoint that fails degrades only
//! the fields it feeds and the rest of the collection proceeds. Nothing
//! here returns an error; the worst case is all-Unknown signals.
//!
//! Call order is fixed by data dependency: the metadata fetch produces
//! the head commit sha the CI and review fetches key on. One attempt per
//! endpoint per invocation, no retries.

use crate::description::classify_description;
use crate::signals::{PullRequestRef, ReviewabilitySignals, Signal};
use gh_client::{CheckConclusion, CheckRunStatus, CommitState, GitHubClient};
use log::{debug, warn};

/// Collect reviewability signals for one pull request.
///
/// `viewer_login` is the authenticated user's login when known; without
/// it the review fetch is skipped and `viewer_has_active_review` stays
/// false (a PR is never excluded without positive evidence).
///
/// A malformed ref (zero PR number) yields all-Unknown signals without
/// touching the network.
pub async fn collect_signals(
    client: &dyn GitHubClient,
    pr: &PullRequestRef,
    viewer_login: Option<&str>,
) -> ReviewabilitySignals {
    let mut signals = ReviewabilitySignals::unknown();

    if pr.number == 0 {
        debug!("Refusing to collect signals for invalid PR number 0");
        return signals;
    }

    let meta = match client.fetch_pull_request(&pr.owner, &pr.repo, pr.number).await {
        Ok(meta) => meta,
        Err(e) => {
            warn!(
                "Metadata fetch failed for {}/{}#{}: {}",
                pr.owner, pr.repo, pr.number, e
            );
            return signals;
        }
    };

    signals.changed_file_count = meta.changed_files.into();
    signals.has_merge_conflicts = Signal::Known(meta.mergeable_state.has_conflicts());
    signals.is_draft = meta.draft.into();
    signals.requested_reviewer_count =
        Signal::Known(meta.requested_reviewers + meta.requested_teams);
    signals.description = Signal::Known(classify_description(meta.body.as_deref()));

    // Drafts are excluded from scoring anyway; don't spend calls on them.
    let is_draft = signals.is_draft == Signal::Known(true);
    if is_draft {
        return signals;
    }

    let Some(head_sha) = meta.head_sha.as_deref() else {
        debug!(
            "No head sha for {}/{}#{}; CI and review signals stay unknown",
            pr.owner, pr.repo, pr.number
        );
        return signals;
    };

    signals.ci_failed = resolve_ci_failed(client, pr, head_sha).await;

    if let Some(viewer) = viewer_login {
        signals.viewer_has_active_review =
            viewer_has_active_review(client, pr, head_sha, viewer).await;
    }

    signals
}

/// Resolve CI state from at most two ordered sources.
///
/// The structured check-run list is authoritative when conclusive: any
/// failed or cancelled run means failure, and a non-empty list of
/// all-completed runs means success. Everything else — including the
/// empty list — falls through to the legacy combined status endpoint.
async fn resolve_ci_failed(
    client: &dyn GitHubClient,
    pr: &PullRequestRef,
    head_sha: &str,
) -> Signal<bool> {
    match client.fetch_check_runs(&pr.owner, &pr.repo, head_sha).await {
        Ok(runs) => {
            let any_failed = runs.iter().any(|run| {
                matches!(
                    run.conclusion,
                    Some(CheckConclusion::Failure | CheckConclusion::Cancelled)
                )
            });
            if any_failed {
                return Signal::Known(true);
            }

            let all_completed =
                !runs.is_empty() && runs.iter().all(|run| run.status == CheckRunStatus::Completed);
            if all_completed {
                return Signal::Known(false);
            }

            debug!(
                "Check runs inconclusive for {}/{}@{} ({} runs); trying combined status",
                pr.owner,
                pr.repo,
                head_sha,
                runs.len()
            );
        }
        Err(e) => {
            warn!(
                "Check run fetch failed for {}/{}@{}: {}",
                pr.owner, pr.repo, head_sha, e
            );
        }
    }

    match client
        .fetch_combined_status(&pr.owner, &pr.repo, head_sha)
        .await
    {
        Ok(status) => match status.state {
            CommitState::Failure | CommitState::Error => Signal::Known(true),
            CommitState::Success => Signal::Known(false),
            CommitState::Pending => Signal::Unknown,
        },
        Err(e) => {
            warn!(
                "Combined status fetch failed for {}/{}@{}: {}",
                pr.owner, pr.repo, head_sha, e
            );
            Signal::Unknown
        }
    }
}

/// True iff the viewer has a live review against the current head.
///
/// A review counts only when the login matches case-insensitively, the
/// review is not dismissed, and it was recorded against `head_sha` — a
/// review of a superseded revision is stale and must not count.
async fn viewer_has_active_review(
    client: &dyn GitHubClient,
    pr: &PullRequestRef,
    head_sha: &str,
    viewer: &str,
) -> bool {
    match client.fetch_reviews(&pr.owner, &pr.repo, pr.number).await {
        Ok(reviews) => reviews.iter().any(|review| {
            review
                .author
                .as_deref()
                .is_some_and(|login| login.eq_ignore_ascii_case(viewer))
                && !review.is_dismissed()
                && review.commit_id.as_deref() == Some(head_sha)
        }),
        Err(e) => {
            warn!(
                "Review fetch failed for {}/{}#{}: {}",
                pr.owner, pr.repo, pr.number, e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::DescriptionStatus;
    use async_trait::async_trait;
    use gh_client::{
        CheckRun, CombinedStatus, MergeableState, PullRequestMeta, PullRequestSummary, Review,
        ReviewState,
    };
    use std::sync::{Arc, Mutex};

    /// Call counts per endpoint
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    struct Calls {
        pulls: usize,
        check_runs: usize,
        combined_status: usize,
        reviews: usize,
    }

    /// Scriptable client: each endpoint either returns its configured
    /// payload or errors when configured with `None`.
    #[derive(Clone)]
    struct StubClient {
        meta: Option<PullRequestMeta>,
        check_runs: Option<Vec<CheckRun>>,
        combined_status: Option<CombinedStatus>,
        reviews: Option<Vec<Review>>,
        calls: Arc<Mutex<Calls>>,
    }

    impl StubClient {
        fn new(meta: Option<PullRequestMeta>) -> Self {
            Self {
                meta,
                check_runs: Some(vec![]),
                combined_status: None,
                reviews: Some(vec![]),
                calls: Arc::new(Mutex::new(Calls::default())),
            }
        }

        fn calls(&self) -> Calls {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl GitHubClient for StubClient {
        async fn fetch_pull_requests(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> anyhow::Result<Vec<PullRequestSummary>> {
            Ok(vec![])
        }

        async fn fetch_pull_request(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
        ) -> anyhow::Result<PullRequestMeta> {
            self.calls.lock().unwrap().pulls += 1;
            self.meta
                .clone()
                .ok_or_else(|| anyhow::anyhow!("metadata unavailable"))
        }

        async fn fetch_check_runs(
            &self,
            _owner: &str,
            _repo: &str,
            _commit_sha: &str,
        ) -> anyhow::Result<Vec<CheckRun>> {
            self.calls.lock().unwrap().check_runs += 1;
            self.check_runs
                .clone()
                .ok_or_else(|| anyhow::anyhow!("check runs unavailable"))
        }

        async fn fetch_combined_status(
            &self,
            _owner: &str,
            _repo: &str,
            _commit_sha: &str,
        ) -> anyhow::Result<CombinedStatus> {
            self.calls.lock().unwrap().combined_status += 1;
            self.combined_status
                .clone()
                .ok_or_else(|| anyhow::anyhow!("status unavailable"))
        }

        async fn fetch_reviews(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
        ) -> anyhow::Result<Vec<Review>> {
            self.calls.lock().unwrap().reviews += 1;
            self.reviews
                .clone()
                .ok_or_else(|| anyhow::anyhow!("reviews unavailable"))
        }

        async fn post_issue_comment(
            &self,
            _owner: &str,
            _repo: &str,
            _issue_number: u64,
            _body: &str,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        async fn fetch_current_user(&self) -> anyhow::Result<String> {
            Ok("viewer".to_string())
        }
    }

    fn pr_ref() -> PullRequestRef {
        PullRequestRef::new("acme", "widgets", 7)
    }

    fn base_meta() -> PullRequestMeta {
        PullRequestMeta {
            number: 7,
            changed_files: Some(12),
            mergeable_state: MergeableState::Clean,
            head_sha: Some("headsha".to_string()),
            draft: Some(false),
            requested_reviewers: 1,
            requested_teams: 1,
            body: Some("Fixes the widget cache".to_string()),
            author: Some("author".to_string()),
        }
    }

    fn completed_run(conclusion: CheckConclusion) -> CheckRun {
        CheckRun {
            name: "ci".to_string(),
            status: CheckRunStatus::Completed,
            conclusion: Some(conclusion),
        }
    }

    fn review(author: &str, state: ReviewState, commit: &str) -> Review {
        Review {
            author: Some(author.to_string()),
            state,
            commit_id: Some(commit.to_string()),
        }
    }

    #[tokio::test]
    async fn test_invalid_pr_number_makes_no_calls() {
        let client = StubClient::new(Some(base_meta()));
        let pr = PullRequestRef::new("acme", "widgets", 0);

        let signals = collect_signals(&client, &pr, Some("viewer")).await;

        assert_eq!(signals, ReviewabilitySignals::unknown());
        assert_eq!(client.calls(), Calls::default());
    }

    #[tokio::test]
    async fn test_metadata_failure_degrades_everything() {
        let client = StubClient::new(None);

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert_eq!(signals, ReviewabilitySignals::unknown());
        let calls = client.calls();
        assert_eq!(calls.pulls, 1);
        assert_eq!(calls.check_runs, 0);
        assert_eq!(calls.reviews, 0);
    }

    #[tokio::test]
    async fn test_metadata_fields_mapped() {
        let mut client = StubClient::new(Some(PullRequestMeta {
            changed_files: Some(45),
            mergeable_state: MergeableState::Dirty,
            body: Some(String::new()),
            ..base_meta()
        }));
        client.combined_status = Some(CombinedStatus {
            state: CommitState::Failure,
            total_count: 1,
        });

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.changed_file_count, Signal::Known(45));
        assert_eq!(signals.has_merge_conflicts, Signal::Known(true));
        assert_eq!(signals.description, Signal::Known(DescriptionStatus::Empty));
        assert_eq!(signals.requested_reviewer_count, Signal::Known(2));
        assert_eq!(signals.is_draft, Signal::Known(false));
        // Empty check-run list fell through to the failing combined status
        assert_eq!(signals.ci_failed, Signal::Known(true));
    }

    #[tokio::test]
    async fn test_draft_skips_ci_and_reviews() {
        let client = StubClient::new(Some(PullRequestMeta {
            draft: Some(true),
            ..base_meta()
        }));

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert_eq!(signals.is_draft, Signal::Known(true));
        assert_eq!(signals.ci_failed, Signal::Unknown);
        let calls = client.calls();
        assert_eq!(calls.check_runs, 0);
        assert_eq!(calls.combined_status, 0);
        assert_eq!(calls.reviews, 0);
    }

    #[tokio::test]
    async fn test_missing_head_sha_skips_ci_and_reviews() {
        let client = StubClient::new(Some(PullRequestMeta {
            head_sha: None,
            ..base_meta()
        }));

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert_eq!(signals.ci_failed, Signal::Unknown);
        assert!(!signals.viewer_has_active_review);
        assert_eq!(client.calls().check_runs, 0);
        assert_eq!(client.calls().reviews, 0);
    }

    #[tokio::test]
    async fn test_failed_check_run_is_conclusive() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = Some(vec![
            completed_run(CheckConclusion::Success),
            completed_run(CheckConclusion::Failure),
        ]);

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Known(true));
        // Conclusive: the legacy endpoint was never consulted
        assert_eq!(client.calls().combined_status, 0);
    }

    #[tokio::test]
    async fn test_cancelled_check_run_counts_as_failure() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = Some(vec![completed_run(CheckConclusion::Cancelled)]);

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Known(true));
    }

    #[tokio::test]
    async fn test_all_completed_runs_mean_success() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = Some(vec![
            completed_run(CheckConclusion::Success),
            completed_run(CheckConclusion::Neutral),
        ]);

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Known(false));
        assert_eq!(client.calls().combined_status, 0);
    }

    #[tokio::test]
    async fn test_in_progress_runs_fall_through_to_status() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = Some(vec![CheckRun {
            name: "ci".to_string(),
            status: CheckRunStatus::InProgress,
            conclusion: None,
        }]);
        client.combined_status = Some(CombinedStatus {
            state: CommitState::Success,
            total_count: 2,
        });

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Known(false));
        assert_eq!(client.calls().combined_status, 1);
    }

    #[tokio::test]
    async fn test_pending_status_leaves_ci_unknown() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = Some(vec![]);
        client.combined_status = Some(CombinedStatus {
            state: CommitState::Pending,
            total_count: 1,
        });

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Unknown);
    }

    #[tokio::test]
    async fn test_check_run_error_still_tries_combined_status() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = None;
        client.combined_status = Some(CombinedStatus {
            state: CommitState::Error,
            total_count: 1,
        });

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Known(true));
        assert_eq!(client.calls().check_runs, 1);
        assert_eq!(client.calls().combined_status, 1);
    }

    #[tokio::test]
    async fn test_both_ci_sources_failing_degrades_only_ci() {
        let mut client = StubClient::new(Some(base_meta()));
        client.check_runs = None;
        client.combined_status = None;

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert_eq!(signals.ci_failed, Signal::Unknown);
        // The metadata-derived fields survived
        assert_eq!(signals.changed_file_count, Signal::Known(12));
        assert_eq!(signals.description, Signal::Known(DescriptionStatus::Full));
    }

    #[tokio::test]
    async fn test_active_review_on_head_counts() {
        let mut client = StubClient::new(Some(base_meta()));
        client.reviews = Some(vec![review("VIEWER", ReviewState::Approved, "headsha")]);

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        // Case-insensitive login match
        assert!(signals.viewer_has_active_review);
    }

    #[tokio::test]
    async fn test_stale_review_does_not_count() {
        let mut client = StubClient::new(Some(base_meta()));
        client.reviews = Some(vec![review("viewer", ReviewState::Approved, "oldsha")]);

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert!(!signals.viewer_has_active_review);
    }

    #[tokio::test]
    async fn test_dismissed_review_does_not_count() {
        let mut client = StubClient::new(Some(base_meta()));
        client.reviews = Some(vec![review("viewer", ReviewState::Dismissed, "headsha")]);

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert!(!signals.viewer_has_active_review);
    }

    #[tokio::test]
    async fn test_other_reviewers_do_not_count() {
        let mut client = StubClient::new(Some(base_meta()));
        client.reviews = Some(vec![review("someone-else", ReviewState::Approved, "headsha")]);

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert!(!signals.viewer_has_active_review);
    }

    #[tokio::test]
    async fn test_unknown_viewer_skips_review_fetch() {
        let client = StubClient::new(Some(base_meta()));

        let signals = collect_signals(&client, &pr_ref(), None).await;

        assert!(!signals.viewer_has_active_review);
        assert_eq!(client.calls().reviews, 0);
    }

    #[tokio::test]
    async fn test_end_to_end_worst_case_scores_zero() {
        // 45 files, conflicts, blank body, failing CI, nobody asked to
        // review: 10 - 2 - 3 - 2 - 3 - 1 clamps to 0.
        let mut client = StubClient::new(Some(PullRequestMeta {
            changed_files: Some(45),
            mergeable_state: MergeableState::Dirty,
            body: Some(String::new()),
            requested_reviewers: 0,
            requested_teams: 0,
            ..base_meta()
        }));
        client.check_runs = Some(vec![]);
        client.combined_status = Some(CombinedStatus {
            state: CommitState::Failure,
            total_count: 1,
        });

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        match crate::score::evaluate(&signals) {
            crate::score::ScoreOutcome::Scored(score) => {
                assert_eq!(score.value, 0);
                assert_eq!(score.deductions.len(), 5);
            }
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_review_fetch_error_degrades_to_false() {
        let mut client = StubClient::new(Some(base_meta()));
        client.reviews = None;

        let signals = collect_signals(&client, &pr_ref(), Some("viewer")).await;

        assert!(!signals.viewer_has_active_review);
        assert_eq!(client.calls().reviews, 1);
    }
}
