//! Notehub client for OAuth2 token acquisition and event queries.
//!
//! This module provides a client for the two Notehub services the server
//! depends on:
//! - Client-credentials token exchange via `POST {auth}/oauth2/token`
//! - Tracking event queries via `GET {api}/v1/projects/{project}/events`
//!
//! # Architecture
//!
//! The [`NotehubClient`] is shared across request handlers (via `Arc`) and
//! owns the process-wide [`TokenCache`]. Every call is single-attempt: a
//! transport or authorization failure is logged with whatever diagnostic
//! detail is available and then returned to the caller unchanged. There is
//! no retry and no backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use trackflow_server::config::Config;
//! use trackflow_server::notehub::NotehubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = NotehubClient::new(&config)?;
//!
//!     let events = client.get_events(25).await?;
//!     println!("fetched {} events", events.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::token::{CachedToken, TokenCache, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};
use crate::types::{Event, NotehubEventsResponse};

/// Notefile holding tracker location events.
pub const TRACK_NOTEFILE: &str = "_track.qo";

/// Field the events query is sorted by.
const SORT_BY: &str = "captured";

/// Sort order for the events query (most recent first).
const SORT_ORDER: &str = "desc";

/// Errors that can occur when talking to Notehub.
///
/// The HTTP boundary collapses all of these into a single generic message;
/// the variants exist so the failure can be logged precisely.
#[derive(Debug, Error)]
pub enum NotehubError {
    /// The token request was rejected or returned no usable token.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// The events resource answered with a non-success status.
    #[error("events request failed with status {status}: {body}")]
    UpstreamFetch {
        /// Status code returned by Notehub.
        status: StatusCode,
        /// Response body, as text.
        body: String,
    },

    /// A response body could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Notehub could not be reached.
    #[error("notehub unavailable: {0}")]
    Unavailable(String),

    /// Client configuration error.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

/// Response format from the OAuth2 token endpoint.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client for the Notehub authorization and events APIs.
pub struct NotehubClient {
    /// The underlying HTTP client.
    http_client: Client,

    /// Events API base URL, without a trailing slash.
    api_url: String,

    /// Authorization server base URL, without a trailing slash.
    auth_url: String,

    client_id: String,
    client_secret: String,
    project_uid: String,

    /// Timeout applied to every request, kept for error reporting.
    request_timeout: Duration,

    /// Cached bearer token.
    tokens: TokenCache,
}

impl std::fmt::Debug for NotehubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotehubClient")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("project_uid", &self.project_uid)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl NotehubClient {
    /// Creates a new client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotehubError::Configuration`] if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, NotehubError> {
        Self::with_token_cache(config, TokenCache::new())
    }

    /// Creates a new client that uses the given token cache.
    ///
    /// # Errors
    ///
    /// Returns [`NotehubError::Configuration`] if the HTTP client cannot be created.
    pub fn with_token_cache(config: &Config, tokens: TokenCache) -> Result<Self, NotehubError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                NotehubError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            project_uid: config.project_uid.clone(),
            request_timeout: config.request_timeout,
            tokens,
        })
    }

    /// Fetches the most recent tracking events, newest capture first.
    ///
    /// Obtains (or reuses) a bearer token, then issues a single query with
    /// `pageSize=limit`, `files=_track.qo`, `sortOrder=desc` and
    /// `sortBy=captured`. The list is returned exactly as Notehub sent it.
    ///
    /// # Errors
    ///
    /// - [`NotehubError::Auth`] - Token acquisition failed
    /// - [`NotehubError::UpstreamFetch`] - The events resource returned an error status
    /// - [`NotehubError::MalformedResponse`] - The events body could not be parsed
    /// - [`NotehubError::Timeout`] / [`NotehubError::Unavailable`] - Transport failure
    pub async fn get_events(&self, limit: u32) -> Result<Vec<Event>, NotehubError> {
        let token = self.bearer_token().await?;
        let url = format!("{}/v1/projects/{}/events", self.api_url, self.project_uid);
        let page_size = limit.to_string();

        debug!(url = %url, page_size = limit, "Fetching events from Notehub");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("pageSize", page_size.as_str()),
                ("files", TRACK_NOTEFILE),
                ("sortOrder", SORT_ORDER),
                ("sortBy", SORT_BY),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, page_size = limit, error = %e, "Error fetching events");
                self.transport_error(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body,
                headers = ?headers,
                url = %url,
                page_size = limit,
                "Error fetching events"
            );
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate();
            }
            return Err(NotehubError::UpstreamFetch { status, body });
        }

        let events_response: NotehubEventsResponse = response.json().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to parse events response");
            NotehubError::MalformedResponse(format!("failed to parse events response: {e}"))
        })?;

        debug!(count = events_response.events.len(), "Fetched events");

        Ok(events_response.events)
    }

    /// Returns the token cache, mainly for health reporting.
    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Returns a fresh bearer token, fetching one if the cache misses.
    async fn bearer_token(&self) -> Result<String, NotehubError> {
        if let Some(token) = self.tokens.get() {
            return Ok(token);
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token().to_string();
        self.tokens.store(token);
        Ok(access_token)
    }

    /// Performs the client-credentials grant.
    ///
    /// Nothing is cached here; the caller stores the token on success.
    async fn fetch_token(&self) -> Result<CachedToken, NotehubError> {
        let url = format!("{}/oauth2/token", self.auth_url);

        debug!(url = %url, "Requesting bearer token");

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Error getting auth token");
                self.transport_error(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body,
                headers = ?headers,
                "Error getting auth token"
            );
            return Err(NotehubError::Auth(format!(
                "token request failed with status {status}"
            )));
        }

        let auth: AuthResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse token response");
            NotehubError::MalformedResponse(format!("failed to parse token response: {e}"))
        })?;

        let access_token = match auth.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                error!("Error getting auth token: no access token received");
                return Err(NotehubError::Auth("no access token received".to_string()));
            }
        };

        let ttl = auth
            .expires_in
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        if ttl > MAX_TOKEN_TTL {
            warn!(
                expires_in = ttl.as_secs(),
                max_secs = MAX_TOKEN_TTL.as_secs(),
                "Token lifetime exceeds the maximum, capping"
            );
        }

        let margin = self.tokens.refresh_margin();
        if ttl <= margin {
            warn!(
                expires_in = ttl.as_secs(),
                margin_secs = margin.as_secs(),
                "Token lifetime is within the refresh margin, refreshing at half its lifetime"
            );
        }

        let ttl = ttl.min(MAX_TOKEN_TTL);

        info!(
            token_type = auth.token_type.as_deref().unwrap_or("bearer"),
            ttl_secs = ttl.as_secs(),
            "Obtained Notehub bearer token"
        );

        Ok(CachedToken::new(access_token, ttl))
    }

    /// Maps a reqwest transport failure to a [`NotehubError`].
    fn transport_error(&self, e: reqwest::Error) -> NotehubError {
        if e.is_timeout() {
            NotehubError::Timeout(self.request_timeout)
        } else if e.is_connect() {
            NotehubError::Unavailable(format!("connection failed: {e}"))
        } else {
            NotehubError::Unavailable(format!("request failed: {e}"))
        }
    }
}
