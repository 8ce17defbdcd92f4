//! GitHub token resolution
//!
//! The pipeline runs unattended, so the token comes from the environment
//! rather than an interactive prompt. Resolution order:
//! 1. `GITHUB_TOKEN` env var
//! 2. `GH_TOKEN` env var
//! 3. `gh auth token` command

use anyhow::{Context, Result};
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves the GitHub personal access token for api.github.com
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver, snapshotting the environment
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok();

        Self { default_token }
    }

    /// Create a resolver with a fixed token (bypasses env and gh CLI)
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            default_token: Some(token.into()),
        }
    }

    /// Resolve a token, falling back to the gh CLI when no env var is set
    pub async fn get_token(&self) -> Result<String> {
        if let Some(ref token) = self.default_token {
            debug!("Using token from GITHUB_TOKEN/GH_TOKEN");
            return Ok(token.clone());
        }

        debug!("No token env var set, trying gh CLI");
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token"])
            .output()
            .await
            .context("Failed to run 'gh auth token'")?;

        if output.status.success() {
            let token = String::from_utf8(output.stdout)
                .context("Invalid UTF-8 in gh auth token output")?
                .trim()
                .to_string();
            if !token.is_empty() {
                debug!("Using token from gh CLI");
                return Ok(token);
            }
        }

        Err(anyhow::anyhow!(
            "No GitHub token found. Set GITHUB_TOKEN or run 'gh auth login'"
        ))
    }
}

/// Build an authenticated octocrab instance for api.github.com
pub fn build_octocrab(token: String) -> Result<Arc<Octocrab>> {
    let octocrab = Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to build Octocrab client")?;
    Ok(Arc::new(octocrab))
}
