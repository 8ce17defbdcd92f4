//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. The trait covers exactly the endpoints
//! the triage pipeline reads, plus the one mutation it shares a
//! credential with (posting an issue comment).

use crate::types::{
    CheckRun, CombinedStatus, PullRequestMeta, PullRequestSummary, Review,
};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can be direct (hitting the API) or test doubles.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, PullRequestSummary};
///
/// async fn open_prs(client: &dyn GitHubClient) -> anyhow::Result<Vec<PullRequestSummary>> {
///     client.fetch_pull_requests("rust-lang", "rust").await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch open pull requests for a repository
    ///
    /// Returns lightweight summaries, one per open PR. This is the
    /// candidate-row snapshot the batch driver works from.
    async fn fetch_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequestSummary>>;

    /// Fetch a single pull request by number
    ///
    /// This returns full PR details including `changed_files` and the
    /// requested reviewer lists, which the list endpoint does not carry.
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequestMeta>;

    /// Fetch CI check runs for a specific commit
    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>>;

    /// Fetch combined commit status
    ///
    /// This uses the legacy Status API which some CI systems still use
    /// (as opposed to the newer Checks API).
    async fn fetch_combined_status(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<CombinedStatus>;

    /// Fetch the reviews submitted on a pull request
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>>;

    /// Post a comment on an issue or pull request
    ///
    /// PRs are issues as far as the comments endpoint is concerned, so
    /// this serves the triage actions (`!promote` and friends) as well.
    async fn post_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> anyhow::Result<()>;

    /// Fetch the authenticated user's login
    ///
    /// The pipeline needs the viewer's identity to tell "my review"
    /// apart from everyone else's.
    async fn fetch_current_user(&self) -> anyhow::Result<String>;
}
