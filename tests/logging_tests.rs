use datafold_store::logging::config::LogConfig;
use datafold_store::logging::{LoggingError, LoggingSystem};

// The logger is process-wide, so initialization is exercised in a single test.
#[test]
fn test_logging_initializes_once() {
    let mut invalid = LogConfig::default();
    invalid.default_level = "LOUD".to_string();
    assert!(matches!(
        LoggingSystem::init_with_config(invalid),
        Err(LoggingError::ConfigError(_))
    ));
    assert!(!LoggingSystem::is_initialized());

    let mut config = LogConfig::default();
    config
        .features
        .insert("permissions".to_string(), "DEBUG".to_string());
    LoggingSystem::init_with_config(config.clone()).unwrap();

    assert!(LoggingSystem::is_initialized());
    assert_eq!(LoggingSystem::get_config(), Some(config));
    assert!(matches!(
        LoggingSystem::init_default(),
        Err(LoggingError::AlreadyInitialized)
    ));

    datafold_store::log_permissions_debug!("permission logging is live");
}
