//! services/flashlearn/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub activity_id: String,
    /// Directory of the file-backed host profile service. `None` runs local-only.
    pub host_dir: Option<PathBuf>,
    /// Launch URL as the embedding host would supply it, e.g. `/?config=...`.
    pub launch_url: Option<String>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let data_dir = std::env::var("FLASHLEARN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.flashlearn"));

        let activity_id = std::env::var("FLASHLEARN_ACTIVITY_ID")
            .unwrap_or_else(|_| "flashlearniverse-activity".to_string());
        if activity_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "FLASHLEARN_ACTIVITY_ID".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let host_dir = std::env::var("FLASHLEARN_HOST_DIR").ok().map(PathBuf::from);
        let launch_url = std::env::var("FLASHLEARN_LAUNCH_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            data_dir,
            activity_id,
            host_dir,
            launch_url,
            log_level,
        })
    }
}
