//! Configuration management for the logging system
//!
//! Logging configuration is loaded from TOML (usually as the `[log]` table
//! of the store configuration) and can be overridden through environment
//! variables.

use crate::logging::features::LogFeature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const VALID_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Main logging configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level for all modules
    pub default_level: String,
    /// Console output configuration
    pub console: ConsoleConfig,
    /// Feature-specific log levels
    pub features: HashMap<String, String>,
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enable console output
    pub enabled: bool,
    /// Include timestamps
    pub include_timestamp: bool,
    /// Include module path
    pub include_module: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "INFO".to_string(),
            console: ConsoleConfig::default(),
            features: Self::default_features(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_timestamp: true,
            include_module: true,
        }
    }
}

impl LogConfig {
    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Apply overrides from `(name, value)` pairs shaped like environment
    /// variables.
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if key == "DATAFOLD_STORE_LOG_LEVEL" {
                self.default_level = value.to_uppercase();
            } else if key == "DATAFOLD_STORE_LOG_CONSOLE_ENABLED" {
                self.console.enabled = value.parse().unwrap_or(true);
            } else if let Some(feature) = key.strip_prefix("DATAFOLD_STORE_LOG_FEATURE_") {
                self.features
                    .insert(feature.to_lowercase(), value.to_uppercase());
            }
        }
    }

    /// Get default feature-specific log levels
    fn default_features() -> HashMap<String, String> {
        LogFeature::ALL
            .iter()
            .map(|feature| {
                let level = match feature {
                    LogFeature::Permissions => "INFO",
                    LogFeature::Store => "WARN",
                    LogFeature::Schema => "INFO",
                    LogFeature::Config => "INFO",
                };
                (feature.name().to_string(), level.to_string())
            })
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&self.default_level.as_str()) {
            return Err(ConfigError::InvalidLevel(self.default_level.clone()));
        }

        for (feature, level) in &self.features {
            if LogFeature::from_name(feature).is_none() {
                return Err(ConfigError::UnknownFeature(feature.clone()));
            }
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidFeatureLevel(
                    feature.clone(),
                    level.clone(),
                ));
            }
        }

        Ok(())
    }
}

/// Parses a validated level name into a filter.
pub(crate) fn level_filter(level: &str) -> log::LevelFilter {
    match level {
        "TRACE" => log::LevelFilter::Trace,
        "DEBUG" => log::LevelFilter::Debug,
        "INFO" => log::LevelFilter::Info,
        "WARN" => log::LevelFilter::Warn,
        "ERROR" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Invalid log level for feature '{0}': {1}")]
    InvalidFeatureLevel(String, String),
    #[error("Unknown logging feature: {0}")]
    UnknownFeature(String),
}
