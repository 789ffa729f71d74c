//! Configuration module for the store
//!
//! `StoreConfig` is read from a TOML file, with environment variables taking
//! precedence:
//!
//! ```toml
//! default_policy = "read-only"
//!
//! [log]
//! default_level = "DEBUG"
//! ```

use crate::error::{StoreError, StoreResult};
use crate::logging::config::LogConfig;
use crate::permissions::Permission;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `default_policy`
pub const DEFAULT_POLICY_ENV: &str = "DATAFOLD_STORE_DEFAULT_POLICY";

/// Configuration for stores built by an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Policy for fields without a declared permission
    pub default_policy: Permission,
    /// Logging configuration
    pub log: LogConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_policy: Permission::ReadWrite,
            log: LogConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: StoreConfig = toml::from_str(&content)?;
        config.apply_env_overrides()?;
        crate::log_config_info!(
            "Loaded store configuration from {}",
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> StoreResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) -> StoreResult<()> {
        self.apply_overrides(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs shaped like environment
    /// variables.
    pub fn apply_overrides<I>(&mut self, vars: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        if let Some((_, value)) = vars.iter().find(|(key, _)| key == DEFAULT_POLICY_ENV) {
            self.default_policy = value.parse::<Permission>().map_err(|e: String| {
                crate::log_config_warn!("Rejected {}={}", DEFAULT_POLICY_ENV, value);
                StoreError::Config(format!("{}: {}", DEFAULT_POLICY_ENV, e))
            })?;
        }
        self.log.apply_overrides(vars);
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> StoreResult<()> {
        self.log
            .validate()
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
        let content = toml::to_string_pretty(self)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
