//! HTTP route handlers for the TrackFlow server.
//!
//! This module provides the HTTP API endpoints:
//!
//! - `GET /api/events/{timestamp}` - Recent tracking events
//! - `GET /health` - Health check endpoint
//!
//! The `{timestamp}` path segment is a cache-buster chosen by the client; it
//! is accepted and ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use trackflow_server::config::Config;
//! use trackflow_server::routes::{create_router, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("failed to load config");
//!     let state = AppState::new(&config).expect("failed to build client");
//!     let app = create_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::error::ServerError;
use crate::notehub::{NotehubClient, NotehubError};
use crate::types::EventsResponse;

/// Page size used when the request has no usable `limit`.
pub const DEFAULT_LIMIT: u32 = 50;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Notehub client, shared by every request.
    pub notehub: Arc<NotehubClient>,

    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Creates a new application state with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotehubError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, NotehubError> {
        Ok(Self::with_client(NotehubClient::new(config)?))
    }

    /// Creates application state around an existing client.
    #[must_use]
    pub fn with_client(notehub: NotehubClient) -> Self {
        Self {
            notehub: Arc::new(notehub),
            start_time: Instant::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("notehub", &self.notehub)
            .field("start_time", &self.start_time)
            .finish()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Creates the application router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/api/events/{timestamp}", get(get_events))
        .route("/health", get(get_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// GET /api/events/{timestamp}
// ============================================================================

/// Query parameters for the events endpoint.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Requested page size, as sent by the client.
    pub limit: Option<String>,
}

/// Resolves the page size from the raw `limit` parameter.
///
/// The leading decimal integer of the value is used (`"25abc"` is 25).
/// Absent, unparseable, zero, or negative values fall back to
/// [`DEFAULT_LIMIT`]. There is no upper bound.
pub fn resolve_limit(raw: Option<&str>) -> u32 {
    raw.and_then(parse_leading_int)
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(DEFAULT_LIMIT)
}

/// Parses the leading decimal integer of `s`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Digit runs too long for `i64` saturate. Returns `None`
/// if no digit follows.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// GET /api/events/{timestamp} - Recent tracking events.
///
/// # Responses
///
/// - `200 OK` - `{"events": [...]}`
/// - `500 Internal Server Error` - `{"error": "Failed to fetch events"}`
async fn get_events(
    State(state): State<AppState>,
    Path(_cache_buster): Path<String>,
    Query(query): Query<EventsQuery>,
) -> Result<Response, ServerError> {
    let limit = resolve_limit(query.limit.as_deref());

    let events = state.notehub.get_events(limit).await.map_err(|err| {
        error!(error = %err, limit, "Error fetching events");
        ServerError::from(err)
    })?;

    info!(limit, count = events.len(), "Served events");

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(EventsResponse { events }),
    )
        .into_response())
}

// ============================================================================
// GET /health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub token_cached: bool,
}

/// GET /health - Health check endpoint.
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        token_cached: state.notehub.token_cache().has_fresh_token(),
    })
}

// ============================================================================
// Tests
// ============================================================================
