pub mod config;
pub mod error;
pub mod load;

pub use config::{Config, LogConfig, LogLevel, ServerConfig, WorkspaceConfig};
pub use error::ConfigError;
pub use load::{load_config, load_from_str};
