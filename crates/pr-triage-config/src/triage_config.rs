//! Application configuration
//!
//! Configuration loaded from pr-triage.toml.

use crate::config_file;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Application configuration loaded from pr-triage.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TriageConfig {
    /// Target repository owner (user or organization)
    #[serde(default)]
    pub owner: String,

    /// Target repository name
    #[serde(default)]
    pub repo: String,

    /// Rows evaluated concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seconds between scan ticks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Comment body posted by the promote action
    #[serde(default = "default_promote_comment")]
    pub promote_comment: String,

    /// Comment body posted by the run-tests action
    #[serde(default = "default_test_comment")]
    pub test_comment: String,

    /// Comment body posted by the approve action
    #[serde(default = "default_approve_comment")]
    pub approve_comment: String,
}

fn default_batch_size() -> usize {
    10
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_promote_comment() -> String {
    "!promote".to_string()
}

fn default_test_comment() -> String {
    "!run-tests".to_string()
}

fn default_approve_comment() -> String {
    "!approve".to_string()
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            batch_size: default_batch_size(),
            poll_interval_secs: default_poll_interval_secs(),
            promote_comment: default_promote_comment(),
            test_comment: default_test_comment(),
            approve_comment: default_approve_comment(),
        }
    }
}

impl TriageConfig {
    /// Load config from CWD first, then the XDG config dir, or use
    /// defaults when no file exists. A present-but-broken file is an
    /// error; silently scoring the wrong repository would be worse.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file::load_config_file()? {
            Some(content) => {
                let config = toml::from_str(&content)?;
                log::info!("Loaded triage config from file");
                Ok(config)
            }
            None => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Fail unless a target repository is configured.
    pub fn require_repository(&self) -> Result<(), ConfigError> {
        if self.owner.is_empty() || self.repo.is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        Ok(())
    }
}
