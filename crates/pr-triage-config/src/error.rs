//! Typed configuration errors

use thiserror::Error;

/// Errors surfaced while loading or validating the triage config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but is not valid TOML for `TriageConfig`.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No target repository was configured anywhere.
    #[error(
        "No repository configured: set `owner` and `repo` in pr-triage.toml or pass --owner/--repo"
    )]
    MissingRepository,
}
