//! Server configuration module.
//!
//! Parses configuration from environment variables for the TrackFlow server.
//! The binary loads a `.env` file (if present) before calling [`Config::from_env`].
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `NOTEHUB_CLIENT_ID` | Yes | - | OAuth2 client id for the Notehub project |
//! | `NOTEHUB_CLIENT_SECRET` | Yes | - | OAuth2 client secret |
//! | `NOTEHUB_PROJECT_UID` | Yes | - | Project identifier (`app:...`) |
//! | `NOTEHUB_API_URL` | No | `https://api.notefile.net` | Events API base URL |
//! | `NOTEHUB_AUTH_URL` | No | `https://notehub.io` | OAuth2 token endpoint base URL |
//! | `NOTEHUB_REQUEST_TIMEOUT_SECS` | No | 10 | Timeout for outbound requests |
//! | `PORT` | No | 8080 | HTTP server port |

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default HTTP server port.
const DEFAULT_PORT: u16 = 8080;

/// Default Notehub events API base URL.
pub const DEFAULT_API_URL: &str = "https://api.notefile.net";

/// Default Notehub OAuth2 base URL.
pub const DEFAULT_AUTH_URL: &str = "https://notehub.io";

/// Default timeout for outbound Notehub requests.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has invalid format.
    #[error("invalid format for {var}: {message}")]
    InvalidFormat { var: String, message: String },

    /// Port number is invalid.
    #[error("invalid port number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Server configuration parsed from environment variables.
#[derive(Clone)]
pub struct Config {
    /// OAuth2 client id.
    pub client_id: String,

    /// OAuth2 client secret. Never logged.
    pub client_secret: String,

    /// Notehub project identifier used in the events path.
    pub project_uid: String,

    /// Base URL of the events API.
    pub api_url: String,

    /// Base URL of the OAuth2 authorization server.
    pub auth_url: String,

    /// Timeout applied to every outbound request.
    pub request_timeout: Duration,

    /// HTTP server port.
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("project_uid", &self.project_uid)
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("request_timeout", &self.request_timeout)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Parse configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Any of the three Notehub credentials is missing or empty
    /// - `PORT` or `NOTEHUB_REQUEST_TIMEOUT_SECS` is not a valid number
    ///
    /// # Example
    ///
    /// ```no_run
    /// use trackflow_server::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load config");
    /// println!("Server will listen on port {}", config.port);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = required_env("NOTEHUB_CLIENT_ID")?;
        let client_secret = required_env("NOTEHUB_CLIENT_SECRET")?;
        let project_uid = required_env("NOTEHUB_PROJECT_UID")?;
        let api_url = optional_env("NOTEHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let auth_url = optional_env("NOTEHUB_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into());
        let request_timeout = parse_request_timeout()?;
        let port = parse_port()?;

        Ok(Self {
            client_id,
            client_secret,
            project_uid,
            api_url,
            auth_url,
            request_timeout,
            port,
        })
    }
}

/// Reads a required variable, treating an empty value as missing.
fn required_env(name: &str) -> Result<String, ConfigError> {
    optional_env(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads an optional variable, trimming whitespace and ignoring empty values.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the PORT environment variable.
///
/// Returns the default port if not set.
fn parse_port() -> Result<u16, ConfigError> {
    match env::var("PORT") {
        Ok(port_str) => Ok(port_str.trim().parse()?),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_PORT),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidFormat {
            var: "PORT".to_string(),
            message: "contains invalid unicode".to_string(),
        }),
    }
}

/// Parse `NOTEHUB_REQUEST_TIMEOUT_SECS` (must be at least one second).
fn parse_request_timeout() -> Result<Duration, ConfigError> {
    let Some(raw) = optional_env("NOTEHUB_REQUEST_TIMEOUT_SECS") else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidFormat {
            var: "NOTEHUB_REQUEST_TIMEOUT_SECS".to_string(),
            message: format!("expected a positive number of seconds, got '{raw}'"),
        }),
    }
}
