use std::fs;
use std::path::PathBuf;

use booking_analytics::config::{AppConfig, ConfigError};
use tempfile::tempdir;

mod support;
use support::CONFIG_VARS;

fn cleared_env<'a>(extra: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> = CONFIG_VARS.iter().map(|k| (*k, None)).collect();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_load_from_explicit_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("booking-analytics.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9100

[dataset]
path = "/srv/data/bookings.csv"

[forecast]
horizon = 6
require_forecast = false

[assistant]
model = "gemini-2.0-flash"
"#,
    )
    .unwrap();
    let path_str = path.to_str().unwrap();

    let config = support::with_scoped_env(&cleared_env(&[("BOOKING_CONFIG", Some(path_str))]), || {
        AppConfig::load()
    })
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.dataset.path, PathBuf::from("/srv/data/bookings.csv"));
    assert_eq!(config.forecast.horizon, 6);
    assert!(!config.forecast.require_forecast);
    assert_eq!(config.forecast.min_history_points, 2);
    assert_eq!(config.assistant.model, "gemini-2.0-flash");
    assert_eq!(config.assistant_api_key(), None);
}

#[test]
fn test_env_overrides_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[server]\nport = 9100\n").unwrap();
    let path_str = path.to_str().unwrap();

    let config = support::with_scoped_env(
        &cleared_env(&[
            ("BOOKING_CONFIG", Some(path_str)),
            ("PORT", Some("9200")),
            ("MIN_HISTORY_POINTS", Some("3")),
            ("GEMINI_API_KEY", Some("secret")),
        ]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.port, 9200);
    assert_eq!(config.forecast.min_history_points, 3);
    assert_eq!(config.assistant_api_key(), Some("secret"));
}

#[test]
fn test_invalid_settings_fail_validation() {
    let result = support::with_scoped_env(
        &cleared_env(&[("FORECAST_HORIZON", Some("0"))]),
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let result = support::with_scoped_env(
        &cleared_env(&[("MIN_HISTORY_POINTS", Some("1"))]),
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_missing_explicit_config_file_is_error() {
    let result = support::with_scoped_env(
        &cleared_env(&[("BOOKING_CONFIG", Some("/nonexistent/booking-analytics.toml"))]),
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
