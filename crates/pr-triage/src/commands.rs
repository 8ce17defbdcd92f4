//! Subcommand implementations
//!
//! `scan` runs the scoring pipeline on an interval and stays quiet
//! about per-row trouble (degraded signals are a logging concern, not a
//! user-facing one). The comment actions are the opposite: they exist
//! to perform one mutation on request, so their failures propagate with
//! context and a non-zero exit.

use crate::rows::OpenPrRowSource;
use crate::sink::TerminalSink;
use anyhow::{Context, Result};
use gh_client::{build_octocrab, GitHubClient, OctocrabClient, TokenResolver};
use log::{info, warn};
use pr_triage_config::TriageConfig;
use pr_triage_core::{BatchDriver, RowSource};
use std::sync::Arc;
use std::time::Duration;

/// Resolve a token and build the API client
async fn build_client() -> Result<Arc<dyn GitHubClient>> {
    let token = TokenResolver::new().get_token().await?;
    let octocrab = build_octocrab(token)?;
    Ok(Arc::new(OctocrabClient::new(octocrab)))
}

/// Scan open PRs on an interval, annotating each exactly once.
pub async fn run_scan(config: &TriageConfig, owner: &str, repo: &str, once: bool) -> Result<()> {
    let client = build_client().await?;

    let viewer = match client.fetch_current_user().await {
        Ok(login) => Some(login),
        Err(e) => {
            warn!(
                "Could not resolve the authenticated user: {}; own-review exclusion disabled",
                e
            );
            None
        }
    };

    let source = OpenPrRowSource::new(client.clone(), owner, repo);
    let sink = Arc::new(TerminalSink::new());

    let mut driver =
        BatchDriver::new(client, sink, owner, repo).with_batch_size(config.batch_size);
    if let Some(login) = viewer {
        driver = driver.with_viewer_login(login);
    }

    let interval_secs = config.poll_interval_secs.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    info!("Scanning {}/{} every {}s", owner, repo, interval_secs);

    loop {
        ticker.tick().await;

        // The snapshot fetch is the only fallible step the scheduler
        // sees; a bad tick is logged and the next tick retries from
        // scratch.
        match source.candidate_rows().await {
            Ok(rows) => {
                let stats = driver.run(&rows).await;
                info!(
                    "Tick done: {} candidates, {} painted, {} skipped, {} drafts, {} failed",
                    stats.candidates, stats.painted, stats.skipped, stats.drafts, stats.failed
                );
            }
            Err(e) => warn!("Open PR listing failed for {}/{}: {}", owner, repo, e),
        }

        if once {
            break;
        }
    }

    Ok(())
}

/// Post a comment on a PR; failures surface to the user.
pub async fn post_comment(owner: &str, repo: &str, pr: u64, body: &str) -> Result<()> {
    let client = build_client().await?;
    client
        .post_issue_comment(owner, repo, pr, body)
        .await
        .with_context(|| format!("Failed to post comment on {}/{}#{}", owner, repo, pr))?;

    println!("Comment posted on #{}", pr);
    Ok(())
}
