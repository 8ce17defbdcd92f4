//! GitHub API client for the pr-triage pipeline
//!
//! This crate provides a trait-based GitHub API client covering the
//! read-only endpoints the reviewability pipeline consumes (PR listing,
//! PR metadata, check runs, combined status, reviews) plus the single
//! mutation that shares the same credential (issue comments).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               GitHubClient trait                 │
//! │  - fetch_pull_requests()                         │
//! │  - fetch_pull_request()                          │
//! │  - fetch_check_runs() / fetch_combined_status()  │
//! │  - fetch_reviews()                               │
//! │  - post_issue_comment() / fetch_current_user()   │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! Test doubles implement the same trait; the pipeline never depends on
//! the concrete client.

pub mod client;
pub mod octocrab_client;
pub mod token;
pub mod types;

pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use token::{build_octocrab, TokenResolver};
pub use types::{
    CheckConclusion, CheckRun, CheckRunStatus, CombinedStatus, CommitState, MergeableState,
    PullRequestMeta, PullRequestSummary, Review, ReviewState,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
