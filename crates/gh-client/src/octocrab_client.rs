//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab
//! library. Requests go through octocrab's raw route methods with our own
//! response shapes, since octocrab's typed models don't cover every field
//! the pipeline reads (requested teams, review commit ids).

use crate::client::GitHubClient;
use crate::types::{
    CheckConclusion, CheckRun, CheckRunStatus, CombinedStatus, CommitState, MergeableState,
    PullRequestMeta, PullRequestSummary, Review, ReviewState,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::Deserialize;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
///
/// Authentication (`Authorization: token <PAT>`) and the
/// `application/vnd.github.v3+json` accept header are handled by the
/// octocrab instance this wraps.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

// ---- wire-level response shapes ----
//
// Tolerant by construction: every field the API may omit is Option or
// defaulted, so a partial payload deserializes instead of failing the
// whole fetch.

#[derive(Debug, Deserialize)]
struct UserWire {
    login: String,
}

/// Requested teams are only ever counted, so no fields are kept.
#[derive(Debug, Deserialize)]
struct TeamWire {}

#[derive(Debug, Deserialize)]
struct HeadWire {
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullListItemWire {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    user: Option<UserWire>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PullDetailWire {
    number: u64,
    #[serde(default)]
    changed_files: Option<u64>,
    #[serde(default)]
    mergeable_state: Option<String>,
    #[serde(default)]
    head: Option<HeadWire>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    requested_reviewers: Option<Vec<UserWire>>,
    #[serde(default)]
    requested_teams: Option<Vec<TeamWire>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserWire>,
}

#[derive(Debug, Deserialize)]
struct CheckRunWire {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckRunListWire {
    #[serde(default)]
    check_runs: Vec<CheckRunWire>,
}

#[derive(Debug, Deserialize)]
struct CombinedStatusWire {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct ReviewWire {
    #[serde(default)]
    user: Option<UserWire>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    commit_id: Option<String>,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequestSummary>> {
        debug!("Fetching open PRs for {}/{}", owner, repo);

        let mut prs = Vec::new();
        let mut page_num = 1u32;
        const MAX_PRS: usize = 100;
        const PER_PAGE: u8 = 50;

        loop {
            let route = format!(
                "/repos/{}/{}/pulls?state=open&per_page={}&page={}",
                owner, repo, PER_PAGE, page_num
            );
            let page: Vec<PullListItemWire> = self.octocrab.get(route, None::<&()>).await?;
            let page_is_empty = page.is_empty();

            for pr in page {
                if prs.len() >= MAX_PRS {
                    break;
                }
                prs.push(convert_pull_summary(pr));
            }

            if prs.len() >= MAX_PRS || page_is_empty {
                break;
            }

            page_num += 1;
        }

        // Sort by PR number (descending) for stable ordering
        prs.sort_by(|a, b| b.number.cmp(&a.number));

        debug!("Fetched {} open PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequestMeta> {
        debug!("Fetching PR #{} in {}/{}", pr_number, owner, repo);

        let route = format!("/repos/{}/{}/pulls/{}", owner, repo, pr_number);
        let detail: PullDetailWire = self.octocrab.get(route, None::<&()>).await?;

        Ok(convert_pull_detail(detail))
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        debug!("Fetching check runs for {}/{} @ {}", owner, repo, commit_sha);

        let route = format!("/repos/{}/{}/commits/{}/check-runs", owner, repo, commit_sha);
        let list: CheckRunListWire = self.octocrab.get(route, None::<&()>).await?;

        Ok(list.check_runs.into_iter().map(convert_check_run).collect())
    }

    async fn fetch_combined_status(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<CombinedStatus> {
        debug!(
            "Fetching combined status for {}/{} @ {}",
            owner, repo, commit_sha
        );

        let route = format!("/repos/{}/{}/commits/{}/status", owner, repo, commit_sha);
        let status: CombinedStatusWire = self.octocrab.get(route, None::<&()>).await?;

        Ok(CombinedStatus {
            state: commit_state_from_str(status.state.as_deref().unwrap_or("")),
            total_count: status.total_count,
        })
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        debug!("Fetching reviews for PR #{} in {}/{}", pr_number, owner, repo);

        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let reviews: Vec<ReviewWire> = self.octocrab.get(route, None::<&()>).await?;

        Ok(reviews
            .into_iter()
            .map(|r| Review {
                author: r.user.map(|u| u.login),
                state: review_state_from_str(r.state.as_deref().unwrap_or("")),
                commit_id: r.commit_id,
            })
            .collect())
    }

    async fn post_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> anyhow::Result<()> {
        debug!(
            "Posting comment on #{} in {}/{} ({} bytes)",
            issue_number,
            owner,
            repo,
            body.len()
        );

        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue_number);
        let _: serde_json::Value = self
            .octocrab
            .post(route, Some(&serde_json::json!({ "body": body })))
            .await?;

        Ok(())
    }

    async fn fetch_current_user(&self) -> anyhow::Result<String> {
        let user: UserWire = self.octocrab.get("/user", None::<&()>).await?;
        debug!("Authenticated as {}", user.login);
        Ok(user.login)
    }
}

fn convert_pull_summary(pr: PullListItemWire) -> PullRequestSummary {
    PullRequestSummary {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        draft: pr.draft.unwrap_or(false),
        author: pr
            .user
            .map(|u| u.login)
            .unwrap_or_else(|| "unknown".to_string()),
        updated_at: pr.updated_at,
    }
}

fn convert_pull_detail(pr: PullDetailWire) -> PullRequestMeta {
    // An empty sha string means the API had nothing to report; normalize
    // it to None so callers don't fetch checks for "".
    let head_sha = pr
        .head
        .and_then(|h| h.sha)
        .filter(|sha| !sha.is_empty());

    PullRequestMeta {
        number: pr.number,
        changed_files: pr.changed_files,
        mergeable_state: pr
            .mergeable_state
            .as_deref()
            .map(mergeable_state_from_str)
            .unwrap_or_default(),
        head_sha,
        draft: pr.draft,
        requested_reviewers: pr.requested_reviewers.map(|r| r.len() as u64).unwrap_or(0),
        requested_teams: pr.requested_teams.map(|t| t.len() as u64).unwrap_or(0),
        body: pr.body,
        author: pr.user.map(|u| u.login),
    }
}

fn convert_check_run(run: CheckRunWire) -> CheckRun {
    CheckRun {
        name: run.name.unwrap_or_default(),
        status: check_run_status_from_str(run.status.as_deref().unwrap_or("")),
        conclusion: run.conclusion.as_deref().map(check_conclusion_from_str),
    }
}

/// Convert mergeable state string from the GitHub API to our enum
fn mergeable_state_from_str(state: &str) -> MergeableState {
    match state.to_lowercase().as_str() {
        "clean" => MergeableState::Clean,
        "behind" => MergeableState::Behind,
        "dirty" => MergeableState::Dirty,
        "blocked" => MergeableState::Blocked,
        "unstable" => MergeableState::Unstable,
        _ => MergeableState::Unknown,
    }
}

/// Convert check run status string from the GitHub API to our enum
fn check_run_status_from_str(status: &str) -> CheckRunStatus {
    match status.to_lowercase().as_str() {
        "completed" => CheckRunStatus::Completed,
        "in_progress" => CheckRunStatus::InProgress,
        _ => CheckRunStatus::Queued,
    }
}

/// Convert conclusion string from the GitHub API to our enum
fn check_conclusion_from_str(conclusion: &str) -> CheckConclusion {
    match conclusion.to_lowercase().as_str() {
        "success" => CheckConclusion::Success,
        "failure" => CheckConclusion::Failure,
        "neutral" => CheckConclusion::Neutral,
        "cancelled" => CheckConclusion::Cancelled,
        "skipped" => CheckConclusion::Skipped,
        "timed_out" => CheckConclusion::TimedOut,
        "action_required" => CheckConclusion::ActionRequired,
        "stale" => CheckConclusion::Stale,
        _ => CheckConclusion::Neutral,
    }
}

/// Convert combined status state string to our enum
fn commit_state_from_str(state: &str) -> CommitState {
    match state.to_lowercase().as_str() {
        "success" => CommitState::Success,
        "failure" => CommitState::Failure,
        "error" => CommitState::Error,
        _ => CommitState::Pending,
    }
}

/// Convert review state string to our enum
fn review_state_from_str(state: &str) -> ReviewState {
    match state.to_uppercase().as_str() {
        "APPROVED" => ReviewState::Approved,
        "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
        "COMMENTED" => ReviewState::Commented,
        "DISMISSED" => ReviewState::Dismissed,
        "PENDING" => ReviewState::Pending,
        _ => ReviewState::Unknown,
    }
}
