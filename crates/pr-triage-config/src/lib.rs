//! Configuration for pr-triage
//!
//! This crate provides:
//! - File path utilities for the config file (CWD and XDG locations)
//! - Configuration file loading (TOML)
//! - Application configuration (TriageConfig)

pub mod config_file;
pub mod error;
pub mod paths;
pub mod triage_config;

pub use config_file::load_config_file;
pub use error::ConfigError;
pub use paths::{config_dir, global_config_path, local_config_path, LOCAL_CONFIG_FILE};
pub use triage_config::TriageConfig;
