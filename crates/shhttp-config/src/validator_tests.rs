use super::*;
use std::path::PathBuf;

#[test]
fn test_default_config_is_valid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_zero_port() {
    let mut config = Config::default();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert_eq!(result.errors[0].path, "server.port");
}

#[test]
fn test_empty_storage_dir() {
    let mut config = Config::default();
    config.storage.dir = PathBuf::new();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "storage.dir"));
}

#[test]
fn test_unknown_log_level() {
    let mut config = Config::default();
    config.logging.level = "loud".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "logging.level"));
}

#[test]
fn test_log_level_case_insensitive() {
    let mut config = Config::default();
    config.logging.level = "DEBUG".to_string();
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_log_dir_inside_store_warns() {
    let mut config = Config::default();
    config.logging.dir = Some(config.storage.jobs_dir().join("logs"));

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_into_result_reports_every_error() {
    let mut config = Config::default();
    config.server.port = 0;
    config.server.host = String::new();

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("server.port"));
    assert!(message.contains("server.host"));
}

#[test]
fn test_clean_interval_too_large() {
    let mut config = Config::default();
    config.engine.clean_interval_hours = Some(u64::MAX / 1000);

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "engine.clean_interval_hours"));

    config.engine.clean_interval_hours = Some(MAX_CLEAN_INTERVAL_HOURS);
    assert!(ConfigValidator::validate(&config).is_valid());
}
