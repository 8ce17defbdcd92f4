//! Configuration directory paths
//!
//! Uses XDG directories via the `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/pr-triage/`
//! - macOS: `~/Library/Application Support/pr-triage/`
//! - Windows: `%APPDATA%\pr-triage\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "pr-triage";

/// Name of the per-project config file looked up in the CWD
pub const LOCAL_CONFIG_FILE: &str = "pr-triage.toml";

/// Get the application config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to the global config file
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to the local config file (in CWD)
pub fn local_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(LOCAL_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_exists() {
        let dir = config_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_config_paths() {
        let global = global_config_path().unwrap();
        assert!(global.ends_with("config.toml"));

        let local = local_config_path().unwrap();
        assert!(local.ends_with(LOCAL_CONFIG_FILE));
    }
}
