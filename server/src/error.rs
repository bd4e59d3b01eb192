//! Error types for the TrackFlow server.
//!
//! - [`ServerError`] - Top-level server errors, convertible into an HTTP response
//! - [`ErrorResponse`] - The JSON body every failed request receives
//!
//! Callers of the HTTP API never see which kind of failure happened: every
//! [`ServerError`] renders as a `500` with a fixed message. The detailed
//! cause is logged where the error is created.

use std::error::Error;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::notehub::NotehubError;

/// Message returned to clients whenever events cannot be served.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch events";

/// JSON error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Top-level error type for the TrackFlow server.
#[derive(Debug)]
pub enum ServerError {
    /// Notehub call failed (authorization, transport, or response).
    Notehub(NotehubError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notehub(err) => write!(f, "notehub error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Notehub(err) => Some(err),
        }
    }
}

impl From<NotehubError> for ServerError {
    fn from(err: NotehubError) -> Self {
        Self::Notehub(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(FETCH_FAILED_MESSAGE)),
        )
            .into_response()
    }
}
