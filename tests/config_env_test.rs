//! Config environment variable tests
//!
//! `Config::from_env()` also loads a `.env` file via dotenvy, so these tests
//! set every variable they assert on and restore it afterwards.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use serial_test::serial;
use std::env;
use std::path::Path;
use trade_checklist::config::{Config, LogFormat};
use trade_checklist::AppError;

#[test]
#[serial]
fn test_config_from_env_loads_successfully() {
    env::remove_var("CHECKLIST_HISTORY_LIMIT");
    let result = Config::from_env();
    assert!(result.is_ok(), "Config::from_env() should succeed without overrides");
}

#[test]
#[serial]
fn test_config_from_env_custom_paths() {
    env::set_var("CHECKLIST_GRAPH_PATH", "/custom/graph.json");
    env::set_var("CHECKLIST_CACHE_PATH", "/custom/cache.json");
    env::set_var("CHECKLIST_HISTORY_PATH", "/custom/history.json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.graph.path.as_deref(), Some(Path::new("/custom/graph.json")));
    assert_eq!(config.graph.cache_path, Path::new("/custom/cache.json"));
    assert_eq!(config.history.path, Path::new("/custom/history.json"));

    env::remove_var("CHECKLIST_GRAPH_PATH");
    env::remove_var("CHECKLIST_CACHE_PATH");
    env::remove_var("CHECKLIST_HISTORY_PATH");
}

#[test]
#[serial]
fn test_config_from_env_blank_graph_path_is_unset() {
    env::set_var("CHECKLIST_GRAPH_PATH", "   ");

    let config = Config::from_env().unwrap();
    assert!(config.graph.path.is_none());

    env::remove_var("CHECKLIST_GRAPH_PATH");
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    // Restore default
    env::set_var("LOG_FORMAT", "pretty");
}

#[test]
#[serial]
fn test_config_from_env_log_level() {
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.level, "debug");

    env::set_var("LOG_LEVEL", "info");
}

#[test]
#[serial]
fn test_config_from_env_history_limit() {
    env::set_var("CHECKLIST_HISTORY_LIMIT", "12");

    let config = Config::from_env().unwrap();
    assert_eq!(config.history.limit, 12);

    env::remove_var("CHECKLIST_HISTORY_LIMIT");
}

#[test]
#[serial]
fn test_config_from_env_rejects_zero_history_limit() {
    env::set_var("CHECKLIST_HISTORY_LIMIT", "0");

    let result = Config::from_env();
    assert!(matches!(result, Err(AppError::Config { .. })));

    env::remove_var("CHECKLIST_HISTORY_LIMIT");
}
