use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading, parsing,
/// or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The specified config file was not found.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// TOML parsing failed.
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// A config value failed validation.
    #[error("validation error: {field}: {message}")]
    Validation {
        /// The dotted field path (e.g. `server.hostname`).
        field: String,
        /// Human-readable description of the violation.
        message: String,
    },

    /// An I/O error occurred while reading config files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
