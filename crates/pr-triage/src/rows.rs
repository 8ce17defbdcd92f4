//! Candidate rows from the open-PR listing
//!
//! The systems-side replacement for scraping a list page: one candidate
//! row per open pull request, with the listing's `draft` flag carried
//! along so the driver can rule drafts out before any per-PR fetch.

use async_trait::async_trait;
use gh_client::{GitHubClient, PullRequestSummary};
use pr_triage_core::{CandidateRow, RowSource};
use std::sync::Arc;

/// Lists a repository's open PRs as candidate rows
pub struct OpenPrRowSource {
    client: Arc<dyn GitHubClient>,
    owner: String,
    repo: String,
}

impl OpenPrRowSource {
    pub fn new(client: Arc<dyn GitHubClient>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

fn to_candidate_row(summary: PullRequestSummary) -> CandidateRow {
    CandidateRow {
        pr_number: summary.number.to_string(),
        title: summary.title,
        draft: summary.draft,
    }
}

#[async_trait]
impl RowSource for OpenPrRowSource {
    async fn candidate_rows(&self) -> anyhow::Result<Vec<CandidateRow>> {
        let summaries = self
            .client
            .fetch_pull_requests(&self.owner, &self.repo)
            .await?;
        Ok(summaries.into_iter().map(to_candidate_row).collect())
    }
}
