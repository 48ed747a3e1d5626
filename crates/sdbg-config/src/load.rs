use std::path::Path;

use crate::config::Config;
use crate::error::ConfigError;

/// Load a validated [`Config`] from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, unreadable,
/// unparseable, or fails validation.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let config = load_from_str(&content)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}

/// Parse a TOML string directly into a validated [`Config`].
///
/// Useful for tests or one-off parsing without file I/O.
///
/// # Errors
///
/// Returns [`ConfigError`] on parse or validation failure.
pub fn load_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Check the invariants a usable config must satisfy.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.hostname.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "server.hostname".into(),
            message: "must not be empty".into(),
        });
    }
    if config.server.hostname.contains("://") {
        return Err(ConfigError::Validation {
            field: "server.hostname".into(),
            message: "must be a bare hostname without scheme".into(),
        });
    }
    if config.server.username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "server.username".into(),
            message: "must not be empty".into(),
        });
    }
    if !(1..=120).contains(&config.server.timeout_secs) {
        return Err(ConfigError::Validation {
            field: "server.timeout_secs".into(),
            message: "must be between 1 and 120".into(),
        });
    }
    Ok(())
}
