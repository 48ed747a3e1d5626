use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log verbosity level.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug messages.
    Debug,
    /// Informational messages (default).
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Convert to a `tracing`-compatible filter string.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Sandbox connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Sandbox hostname, without scheme (e.g. `dev01-realm.demandware.net`).
    pub hostname: String,
    /// Business Manager username.
    pub username: String,
    /// Business Manager password.
    pub password: String,
    /// Per-request timeout in seconds (1–120).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Local workspace settings used for source listing and path resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Cartridge workspace roots to index.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Directory names excluded from indexing.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules".to_string(), ".git".to_string()]
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log verbosity level.
    #[serde(default)]
    pub level: LogLevel,
    /// Optional path to a log file.
    pub file: Option<PathBuf>,
}

/// Top-level sdbg configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sandbox connection settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Workspace roots for source listing.
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
    /// Log every request and response body verbatim.
    #[serde(default)]
    pub trace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = Config::default();
        assert!(cfg.server.hostname.is_empty());
        assert_eq!(cfg.server.timeout_secs, 10);
        assert!(cfg.workspace.roots.is_empty());
        assert_eq!(cfg.log.level, LogLevel::Info);
        assert!(cfg.log.file.is_none());
        assert!(!cfg.trace);
    }

    #[test]
    fn parse_from_toml_string() {
        let input = r#"
trace = true

[server]
hostname = "dev01-realm.demandware.net"
username = "admin"
password = "secret"

[workspace]
roots = ["/repo/storefront"]
"#;
        let cfg: Config = toml::from_str(input).expect("parse toml");
        assert_eq!(cfg.server.hostname, "dev01-realm.demandware.net");
        assert_eq!(cfg.server.username, "admin");
        // Unspecified fields keep defaults via serde(default)
        assert_eq!(cfg.server.timeout_secs, 10);
        assert_eq!(cfg.workspace.roots, vec![PathBuf::from("/repo/storefront")]);
        assert!(cfg.trace);
    }

    #[test]
    fn serde_roundtrip_preserves_values() {
        let cfg = Config {
            server: ServerConfig {
                hostname: "host".into(),
                username: "u".into(),
                password: "p".into(),
                timeout_secs: 30,
            },
            workspace: WorkspaceConfig {
                roots: vec![PathBuf::from("/a")],
                exclude: vec!["target".into()],
            },
            log: LogConfig {
                level: LogLevel::Debug,
                file: Some(PathBuf::from("/tmp/sdbg.log")),
            },
            trace: true,
        };
        let toml_str = toml::to_string(&cfg).expect("serialize");
        let deserialized: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn log_level_filter_strings() {
        assert_eq!(LogLevel::Trace.as_filter(), "trace");
        assert_eq!(LogLevel::Info.as_filter(), "info");
        assert_eq!(LogLevel::Error.as_filter(), "error");
    }
}
