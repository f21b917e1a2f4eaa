//! Service configuration.
//!
//! Settings are read from `booking-analytics.toml` (or the file named by
//! `BOOKING_CONFIG`), every field falling back to a default, and then
//! overridden from environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::services::forecast::{DEFAULT_HORIZON, DEFAULT_MIN_HISTORY_POINTS};

/// Name of the configuration file searched in the standard locations.
pub const CONFIG_FILE_NAME: &str = "booking-analytics.toml";

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "BOOKING_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted dataset upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Working dataset file, loaded at startup and replaced by uploads.
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_min_history_points")]
    pub min_history_points: usize,
    /// Reject datasets that cannot be forecast instead of publishing them without one.
    #[serde(default = "default_require_forecast")]
    pub require_forecast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("hotel_bookings.csv")
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

fn default_min_history_points() -> usize {
    DEFAULT_MIN_HISTORY_POINTS
}

fn default_require_forecast() -> bool {
    true
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            min_history_points: default_min_history_points(),
            require_forecast: default_require_forecast(),
        }
    }
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Search for `booking-analytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|path| path.is_file())
    }

    /// Resolve the configuration file, apply environment overrides and validate.
    ///
    /// Uses `BOOKING_CONFIG` when set, otherwise the first file found by
    /// [`AppConfig::find_default_file`], otherwise the built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => match Self::find_default_file() {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment-style variables.
    ///
    /// # Variables
    /// - `HOST`, `PORT`, `MAX_UPLOAD_BYTES`
    /// - `DATASET_PATH`
    /// - `FORECAST_HORIZON`, `MIN_HISTORY_POINTS`, `REQUIRE_FORECAST`
    /// - `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `GEMINI_MODEL`, `GEMINI_BASE_URL`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_value("PORT", &port)?;
        }
        if let Some(limit) = var("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_value("MAX_UPLOAD_BYTES", &limit)?;
        }
        if let Some(path) = var("DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Some(horizon) = var("FORECAST_HORIZON") {
            self.forecast.horizon = parse_value("FORECAST_HORIZON", &horizon)?;
        }
        if let Some(points) = var("MIN_HISTORY_POINTS") {
            self.forecast.min_history_points = parse_value("MIN_HISTORY_POINTS", &points)?;
        }
        if let Some(flag) = var("REQUIRE_FORECAST") {
            self.forecast.require_forecast = parse_bool("REQUIRE_FORECAST", &flag)?;
        }
        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")) {
            self.assistant.api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.assistant.model = model;
        }
        if let Some(url) = var("GEMINI_BASE_URL") {
            self.assistant.base_url = url;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.horizon == 0 {
            return Err(ConfigError::Invalid(
                "forecast.horizon must be greater than 0".to_string(),
            ));
        }
        if self.forecast.min_history_points < 2 {
            return Err(ConfigError::Invalid(
                "forecast.min_history_points must be at least 2".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// API key with blank values treated as absent.
    pub fn assistant_api_key(&self) -> Option<&str> {
        self.assistant
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
