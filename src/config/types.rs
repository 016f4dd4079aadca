//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_log_filter, default_prefix};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Dispatcher configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// ```toml
/// prefix = "!"
/// case_insensitive = true
/// help_command = true
///
/// [log]
/// format = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global command prefix. An empty prefix disables the global prefix,
    /// leaving only per-guild prefixes.
    pub prefix: String,
    /// The prefix is its own token (`! ping`) rather than attached (`!ping`).
    pub space_after_prefix: bool,
    /// Fold invocations to lowercase at registration and lookup.
    pub case_insensitive: bool,
    /// Allow commands in direct and group-direct channels.
    pub allow_dm: bool,
    /// Dispatch messages authored by bot accounts.
    pub allow_bots: bool,
    /// Dispatch edited messages as well as new ones.
    pub execute_on_edit: bool,
    /// Register the built-in `help` command.
    pub help_command: bool,
    /// Delete the triggering message after a successful execution.
    pub delete_message_after: bool,
    /// Logging options for the console binary.
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            space_after_prefix: false,
            case_insensitive: false,
            allow_dm: false,
            allow_bots: false,
            execute_on_edit: false,
            help_command: false,
            delete_message_after: false,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config with the given global prefix and all other fields defaulted.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
