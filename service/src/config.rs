//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or parsing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Configuration for a campaign service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). All limits follow the
/// 0-means-unlimited convention.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Maximum number of options a single campaign may hold (0 = unlimited).
    #[serde(default = "default_max_options")]
    pub max_options_per_campaign: u64,

    /// Maximum whitelist size per campaign (0 = unlimited).
    #[serde(default = "default_max_whitelist")]
    pub max_whitelist_size: u64,

    /// Maximum byte length of any title, option name, or URL (0 = unlimited).
    #[serde(default = "default_max_label_bytes")]
    pub max_label_bytes: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_options() -> u64 {
    256
}

fn default_max_whitelist() -> u64 {
    10_000
}

fn default_max_label_bytes() -> u64 {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ServiceConfig is always serializable to TOML")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_options_per_campaign: default_max_options(),
            max_whitelist_size: default_max_whitelist(),
            max_label_bytes: default_max_label_bytes(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
