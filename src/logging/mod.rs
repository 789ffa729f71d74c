//! # Logging System
//!
//! The crate logs through the `log` facade with one target per feature (see
//! [`features::LogFeature`]). Applications that do not install their own
//! logger can call [`LoggingSystem::init_with_config`] to get an
//! `env_logger` backend filtered according to a [`config::LogConfig`].

pub mod config;
pub mod features;

use config::{level_filter, LogConfig};
use features::LogFeature;
use once_cell::sync::OnceCell;
use std::io::Write;

/// Configuration the logger was installed with
static LOGGING_CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Installs and describes the process-wide logger
pub struct LoggingSystem;

impl LoggingSystem {
    /// Initialize the logging system with default configuration
    pub fn init_default() -> Result<(), LoggingError> {
        Self::init_with_config(LogConfig::default())
    }

    /// Initialize the logging system with a custom configuration
    pub fn init_with_config(config: LogConfig) -> Result<(), LoggingError> {
        config.validate()?;
        if LOGGING_CONFIG.get().is_some() {
            return Err(LoggingError::AlreadyInitialized);
        }

        let mut builder = env_logger::Builder::new();
        if config.console.enabled {
            builder.filter_level(level_filter(&config.default_level));
            for (name, level) in &config.features {
                if let Some(feature) = LogFeature::from_name(name) {
                    builder.filter_module(feature.target(), level_filter(level));
                }
            }
        } else {
            builder.filter_level(log::LevelFilter::Off);
        }

        let console = config.console.clone();
        builder.format(move |buf, record| {
            if console.include_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{:<5} ", record.level())?;
            if console.include_module {
                write!(buf, "[{}] ", record.target())?;
            }
            writeln!(buf, "{}", record.args())
        });

        builder
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;
        LOGGING_CONFIG
            .set(config)
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        crate::log_config_info!("Logging initialized");
        Ok(())
    }

    /// Get the configuration the logger was installed with
    pub fn get_config() -> Option<LogConfig> {
        LOGGING_CONFIG.get().cloned()
    }

    pub fn is_initialized() -> bool {
        LOGGING_CONFIG.get().is_some()
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
