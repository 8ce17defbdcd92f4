//! GitHub API data transfer objects
//!
//! These types carry exactly the fields the triage pipeline consumes.
//! They are intentionally separate from the wire-level response shapes
//! (which live next to the client implementation) so the rest of the
//! workspace never touches raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a repository's open pull request listing.
///
/// The listing payload is much smaller than the single-PR endpoint; in
/// particular it carries the `draft` flag, which lets the pipeline rule
/// out drafts before spending any further API calls on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// Whether the PR is marked as a draft
    pub draft: bool,

    /// Author's GitHub username
    pub author: String,

    /// When the PR was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full metadata for a single pull request.
///
/// Fetched from `GET /repos/{owner}/{repo}/pulls/{number}`. Every field
/// the scoring pipeline reads is optional at the wire level; absence is
/// preserved here rather than defaulted away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestMeta {
    /// PR number
    pub number: u64,

    /// Number of changed files (only present on the single-PR endpoint)
    pub changed_files: Option<u64>,

    /// Mergeable state as reported by GitHub
    pub mergeable_state: MergeableState,

    /// HEAD commit SHA, `None` when the API returned an empty value
    pub head_sha: Option<String>,

    /// Whether the PR is a draft
    pub draft: Option<bool>,

    /// Number of individually requested reviewers
    pub requested_reviewers: u64,

    /// Number of requested reviewing teams
    pub requested_teams: u64,

    /// PR body/description
    pub body: Option<String>,

    /// Author's GitHub username
    pub author: Option<String>,
}

/// Mergeable state as reported by GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// The merge is clean
    Clean,
    /// The head branch is behind the base branch
    Behind,
    /// The merge has conflicts
    Dirty,
    /// The merge is blocked (e.g., by required reviews)
    Blocked,
    /// CI checks are failing or pending
    Unstable,
    /// State is unknown or not yet computed
    #[default]
    Unknown,
}

impl MergeableState {
    /// Conflicts are reported by the forge as the literal state "dirty".
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeableState::Dirty)
    }
}

/// A CI check run from the Checks API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Name of the check (e.g., "build", "test")
    pub name: String,

    /// Current status
    pub status: CheckRunStatus,

    /// Conclusion (only set when status is Completed)
    pub conclusion: Option<CheckConclusion>,
}

/// Status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    /// Check is queued
    Queued,
    /// Check is in progress
    InProgress,
    /// Check has completed
    Completed,
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Check was neutral (neither success nor failure)
    Neutral,
    /// Check was cancelled
    Cancelled,
    /// Check was skipped
    Skipped,
    /// Check timed out
    TimedOut,
    /// Action is required from the user
    ActionRequired,
    /// Check is stale (superseded by newer run)
    Stale,
}

/// Combined commit status from the legacy Status API
///
/// Some CI systems still report through this endpoint instead of the
/// Checks API, so the pipeline consults it as a second source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedStatus {
    /// Overall state combining all status checks
    pub state: CommitState,

    /// Total number of status checks
    pub total_count: u64,
}

/// Overall state of a combined commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitState {
    /// All checks passed
    Success,
    /// At least one check is pending
    Pending,
    /// At least one check failed
    Failure,
    /// Error retrieving status
    Error,
}

/// A review submitted on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer's GitHub username
    pub author: Option<String>,

    /// Review state
    pub state: ReviewState,

    /// Commit the review was recorded against
    pub commit_id: Option<String>,
}

/// State of a submitted review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the PR
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Comment-only review
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review is pending submission
    Pending,
    /// Unrecognized state
    Unknown,
}

impl Review {
    /// A dismissed review no longer counts for anything; every other
    /// state is live as long as it targets the right commit.
    pub fn is_dismissed(&self) -> bool {
        self.state == ReviewState::Dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mergeable_state_default() {
        assert_eq!(MergeableState::default(), MergeableState::Unknown);
    }

    #[test]
    fn test_mergeable_state_conflicts() {
        assert!(MergeableState::Dirty.has_conflicts());
        assert!(!MergeableState::Clean.has_conflicts());
        assert!(!MergeableState::Blocked.has_conflicts());
        assert!(!MergeableState::Unknown.has_conflicts());
    }

    #[test]
    fn test_mergeable_state_serde() {
        let states = vec![
            (MergeableState::Clean, "\"clean\""),
            (MergeableState::Behind, "\"behind\""),
            (MergeableState::Dirty, "\"dirty\""),
            (MergeableState::Blocked, "\"blocked\""),
            (MergeableState::Unstable, "\"unstable\""),
            (MergeableState::Unknown, "\"unknown\""),
        ];

        for (state, expected_json) in states {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, expected_json);

            let deserialized: MergeableState = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, state);
        }
    }

    #[test]
    fn test_review_state_serde() {
        let json = "\"CHANGES_REQUESTED\"";
        let state: ReviewState = serde_json::from_str(json).unwrap();
        assert_eq!(state, ReviewState::ChangesRequested);
        assert_eq!(serde_json::to_string(&state).unwrap(), json);
    }

    #[test]
    fn test_review_dismissed() {
        let review = Review {
            author: Some("octocat".to_string()),
            state: ReviewState::Dismissed,
            commit_id: Some("abc123".to_string()),
        };
        assert!(review.is_dismissed());

        let review = Review {
            author: Some("octocat".to_string()),
            state: ReviewState::Approved,
            commit_id: Some("abc123".to_string()),
        };
        assert!(!review.is_dismissed());
    }

    #[test]
    fn test_pull_request_meta_serialization() {
        let meta = PullRequestMeta {
            number: 42,
            changed_files: Some(17),
            mergeable_state: MergeableState::Clean,
            head_sha: Some("abc123".to_string()),
            draft: Some(false),
            requested_reviewers: 2,
            requested_teams: 1,
            body: Some("Fixes the flaky retry loop".to_string()),
            author: Some("octocat".to_string()),
        };

        let json = serde_json::to_string(&meta).unwrap();
        let deserialized: PullRequestMeta = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.number, 42);
        assert_eq!(deserialized.changed_files, Some(17));
        assert_eq!(deserialized.requested_reviewers, 2);
        assert_eq!(deserialized.requested_teams, 1);
    }
}
