//! pr-triage: scores open pull requests for reviewability
//!
//! Fetches signals for every open PR of the configured repository
//! (metadata, CI state, reviews), fuses them into a 0–10 score, and
//! prints one annotated line per PR. Re-scans on an interval; rows
//! already scored are never re-fetched.

mod cli;
mod commands;
mod rows;
mod sink;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use pr_triage_config::{ConfigError, TriageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; a present one augments the environment.
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting pr-triage");

    let cli = Cli::parse();
    let config = TriageConfig::load()?;

    let owner = cli.owner.unwrap_or_else(|| config.owner.clone());
    let repo = cli.repo.unwrap_or_else(|| config.repo.clone());
    if owner.is_empty() || repo.is_empty() {
        return Err(ConfigError::MissingRepository.into());
    }

    match cli.command.unwrap_or(Command::Scan { once: false }) {
        Command::Scan { once } => commands::run_scan(&config, &owner, &repo, once).await?,
        Command::Comment { pr, body } => {
            commands::post_comment(&owner, &repo, pr, &body).await?
        }
        Command::Promote { pr } => {
            commands::post_comment(&owner, &repo, pr, &config.promote_comment).await?
        }
        Command::RunTests { pr } => {
            commands::post_comment(&owner, &repo, pr, &config.test_comment).await?
        }
        Command::Approve { pr } => {
            commands::post_comment(&owner, &repo, pr, &config.approve_comment).await?
        }
    }

    log::info!("Exiting pr-triage");
    Ok(())
}
