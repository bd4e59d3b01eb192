//! HTTP client for the TrackFlow server.
//!
//! Each call to [`EventsClient::fetch_events`] issues a single
//! `GET {server}/api/events/{now_ms}?limit=N`. The millisecond timestamp in
//! the path keeps intermediaries from serving a cached page. There is no
//! retry; failures are reported to the caller, who decides whether to ask
//! again.
//!
//! # Example
//!
//! ```no_run
//! use trackflow_dashboard::client::EventsClient;
//! use trackflow_dashboard::types::EventCount;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EventsClient::new("http://localhost:8080").unwrap();
//!     let events = client.fetch_events(EventCount::Fifty).await.unwrap();
//!     println!("{} events", events.len());
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error};

use crate::types::{ErrorBody, Event, EventCount, EventsResponse};

/// Message shown when the server gives no better explanation.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch events";

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while fetching events.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// The success body was not an events list.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The HTTP client could not be built.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Text suitable for the error screen.
    ///
    /// Server-provided messages are shown as-is; every other failure shows
    /// [`FETCH_FAILED_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            _ => FETCH_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Client for `GET /api/events/{timestamp}`.
#[derive(Debug, Clone)]
pub struct EventsClient {
    http_client: Client,
    server_url: String,
}

impl EventsClient {
    /// Creates a client for the server at `server_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be created.
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    /// The server base URL, without a trailing slash.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// URL of the events resource with the given cache-busting timestamp.
    pub fn events_url(&self, timestamp_ms: i64) -> String {
        format!("{}/api/events/{timestamp_ms}", self.server_url)
    }

    /// Fetches up to `count` of the most recent events.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Network`] - No response (connection refused, timeout)
    /// - [`ClientError::Server`] - Non-success status; carries the server's `error` text
    /// - [`ClientError::MalformedResponse`] - Success status with an unreadable body
    pub async fn fetch_events(&self, count: EventCount) -> Result<Vec<Event>, ClientError> {
        let url = self.events_url(Utc::now().timestamp_millis());
        let limit = count.value();

        debug!(url = %url, limit, "Fetching events");

        let response = self
            .http_client
            .get(&url)
            .query(&[("limit", limit)])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Error in fetch events");
                ClientError::Network(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Error response");

            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string());

            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to read events response");
            ClientError::Network(e.to_string())
        })?;

        let parsed: EventsResponse = serde_json::from_str(&body).map_err(|e| {
            error!(url = %url, error = %e, "Failed to parse events response");
            ClientError::MalformedResponse(e.to_string())
        })?;

        debug!(count = parsed.events.len(), "Fetched events");

        Ok(parsed.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let client = EventsClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.server_url(), "http://localhost:8080");
    }

    #[test]
    fn events_url_embeds_timestamp() {
        let client = EventsClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.events_url(1_700_000_000_123),
            "http://localhost:8080/api/events/1700000000123"
        );
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = ClientError::Server {
            status: 500,
            message: "Failed to fetch events".to_string(),
        };
        assert_eq!(err.user_message(), "Failed to fetch events");

        let err = ClientError::Server {
            status: 502,
            message: "Bad gateway upstream".to_string(),
        };
        assert_eq!(err.user_message(), "Bad gateway upstream");
    }

    #[test]
    fn user_message_is_generic_otherwise() {
        assert_eq!(
            ClientError::Network("connection refused".to_string()).user_message(),
            FETCH_FAILED_MESSAGE
        );
        assert_eq!(
            ClientError::MalformedResponse("eof".to_string()).user_message(),
            FETCH_FAILED_MESSAGE
        );
    }

    #[test]
    fn client_error_display() {
        let err = ClientError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "server error: 500 - boom");
        assert_eq!(
            ClientError::Network("refused".to_string()).to_string(),
            "network error: refused"
        );
    }
}
