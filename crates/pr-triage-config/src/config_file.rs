//! Config file discovery
//!
//! Searches for configuration in:
//! 1. `pr-triage.toml` in the current working directory
//! 2. `config.toml` in the XDG config directory
//!
//! The first file that exists wins; its content is returned verbatim.

use crate::error::ConfigError;
use crate::paths;

/// Load config file content, CWD first, then the XDG config dir.
///
/// Returns `Ok(None)` when no config file exists anywhere. A file that
/// exists but cannot be read is an error, not a fallthrough.
pub fn load_config_file() -> Result<Option<String>, ConfigError> {
    let mut candidates = Vec::new();
    if let Ok(local) = paths::local_config_path() {
        candidates.push(local);
    }
    if let Ok(global) = paths::global_config_path() {
        candidates.push(global);
    }

    for path in candidates {
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
            return Ok(Some(std::fs::read_to_string(&path)?));
        }
    }

    Ok(None)
}
