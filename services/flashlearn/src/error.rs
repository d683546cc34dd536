//! services/flashlearn/src/error.rs
//!
//! Defines the primary error type for the application binary.

use crate::config::ConfigError;

/// The primary error type for the `flashlearn` application.
///
/// Study set and session failures never reach this type: they degrade inside the
/// `study` module and are only logged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., reading console input).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
