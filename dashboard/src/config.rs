//! Configuration module for the TrackFlow dashboard.
//!
//! Values come from environment variables; command-line flags override them
//! via [`Config::with_server_url`] and [`Config::with_event_count`].
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TRACKFLOW_SERVER_URL` | No | `http://localhost:8080` | TrackFlow server base URL |
//! | `TRACKFLOW_EVENT_COUNT` | No | 50 | Initial result count (10, 25, 50, 100 or 200) |
//! | `TRACKFLOW_LOG_DIR` | No | platform data dir | Directory for `dashboard.log` |
//! | `NO_COLOR` | No | - | Disables colors in the terminal UI |
//!
//! # Example
//!
//! ```no_run
//! use trackflow_dashboard::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Server URL: {}", config.server_url);
//! ```

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::types::EventCount;

/// Server used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

const SERVER_URL_VAR: &str = "TRACKFLOW_SERVER_URL";
const EVENT_COUNT_VAR: &str = "TRACKFLOW_EVENT_COUNT";
const LOG_DIR_VAR: &str = "TRACKFLOW_LOG_DIR";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// No platform data directory is available for the log file.
    #[error("failed to determine data directory; set {LOG_DIR_VAR}")]
    NoDataDirectory,
}

/// Configuration for the TrackFlow dashboard.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the TrackFlow server, without a trailing slash.
    pub server_url: String,

    /// Result count requested on startup.
    pub event_count: EventCount,

    /// Directory that receives `dashboard.log`.
    pub log_dir: PathBuf,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `TRACKFLOW_SERVER_URL` is not an `http://` or `https://` URL
    /// - `TRACKFLOW_EVENT_COUNT` is not one of the offered counts
    /// - `TRACKFLOW_LOG_DIR` is unset and no platform data directory exists
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = match optional_env(SERVER_URL_VAR) {
            Some(url) => normalize_server_url(SERVER_URL_VAR, &url)?,
            None => DEFAULT_SERVER_URL.to_string(),
        };

        let event_count = match optional_env(EVENT_COUNT_VAR) {
            Some(raw) => parse_event_count(EVENT_COUNT_VAR, &raw)?,
            None => EventCount::default(),
        };

        let log_dir = match optional_env(LOG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir()?,
        };

        Ok(Self {
            server_url,
            event_count,
            log_dir,
        })
    }

    /// Overrides the server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `url` is not an HTTP(S) URL.
    pub fn with_server_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.server_url = normalize_server_url("--server-url", url)?;
        Ok(self)
    }

    /// Overrides the initial result count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `count` is not offered.
    pub fn with_event_count(mut self, count: u32) -> Result<Self, ConfigError> {
        self.event_count =
            EventCount::from_value(count).ok_or_else(|| invalid_count("--count", count))?;
        Ok(self)
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_server_url(key: &str, url: &str) -> Result<String, ConfigError> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected http:// or https:// URL, got '{url}'"),
        });
    }
    Ok(url.to_string())
}

fn parse_event_count(key: &str, raw: &str) -> Result<EventCount, ConfigError> {
    let value = raw.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected one of 10, 25, 50, 100, 200, got '{raw}'"),
    })?;
    EventCount::from_value(value).ok_or_else(|| invalid_count(key, value))
}

fn invalid_count(key: &str, value: u32) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected one of 10, 25, 50, 100, 200, got {value}"),
    }
}

fn default_log_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "trackflow")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Runs `f` with all TRACKFLOW_* variables cleared, restoring them after.
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let saved_vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with("TRACKFLOW_"))
            .collect();

        for (key, _) in &saved_vars {
            env::remove_var(key);
        }

        let result = f();

        for key in [SERVER_URL_VAR, EVENT_COUNT_VAR, LOG_DIR_VAR] {
            env::remove_var(key);
        }
        for (key, value) in saved_vars {
            env::set_var(key, value);
        }

        result
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        with_clean_env(|| {
            env::set_var(LOG_DIR_VAR, "/tmp/trackflow-test");

            let config = Config::from_env().expect("should parse defaults");

            assert_eq!(config.server_url, DEFAULT_SERVER_URL);
            assert_eq!(config.event_count, EventCount::Fifty);
            assert_eq!(config.log_dir, PathBuf::from("/tmp/trackflow-test"));
        });
    }

    #[test]
    #[serial]
    fn reads_all_variables() {
        with_clean_env(|| {
            env::set_var(SERVER_URL_VAR, "https://trackflow.example.com/");
            env::set_var(EVENT_COUNT_VAR, "200");
            env::set_var(LOG_DIR_VAR, "/var/log/trackflow");

            let config = Config::from_env().expect("should parse");

            assert_eq!(config.server_url, "https://trackflow.example.com");
            assert_eq!(config.event_count, EventCount::TwoHundred);
            assert_eq!(config.log_dir, PathBuf::from("/var/log/trackflow"));
        });
    }

    #[test]
    #[serial]
    fn blank_server_url_uses_default() {
        with_clean_env(|| {
            env::set_var(SERVER_URL_VAR, "   ");
            env::set_var(LOG_DIR_VAR, "/tmp");

            let config = Config::from_env().expect("should parse");
            assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        });
    }

    #[test]
    #[serial]
    fn rejects_non_http_server_url() {
        with_clean_env(|| {
            env::set_var(SERVER_URL_VAR, "ftp://example.com");
            env::set_var(LOG_DIR_VAR, "/tmp");

            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == SERVER_URL_VAR));
        });
    }

    #[test]
    #[serial]
    fn rejects_unoffered_event_count() {
        with_clean_env(|| {
            env::set_var(EVENT_COUNT_VAR, "30");
            env::set_var(LOG_DIR_VAR, "/tmp");

            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("TRACKFLOW_EVENT_COUNT"));
            assert!(err.to_string().contains("30"));
        });
    }

    #[test]
    #[serial]
    fn rejects_non_numeric_event_count() {
        with_clean_env(|| {
            env::set_var(EVENT_COUNT_VAR, "lots");
            env::set_var(LOG_DIR_VAR, "/tmp");

            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    #[serial]
    fn flag_overrides_apply_after_env() {
        with_clean_env(|| {
            env::set_var(SERVER_URL_VAR, "http://from-env:8080");
            env::set_var(LOG_DIR_VAR, "/tmp");

            let config = Config::from_env()
                .and_then(|c| c.with_server_url("http://from-flag:9090/"))
                .and_then(|c| c.with_event_count(10))
                .expect("overrides should apply");

            assert_eq!(config.server_url, "http://from-flag:9090");
            assert_eq!(config.event_count, EventCount::Ten);
        });
    }

    #[test]
    fn with_event_count_rejects_unoffered_value() {
        let config = Config {
            server_url: DEFAULT_SERVER_URL.to_string(),
            event_count: EventCount::default(),
            log_dir: PathBuf::from("/tmp"),
        };

        let err = config.with_event_count(7).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "--count"));
    }
}
