//! Error types for the TrackFlow dashboard.

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;

/// Errors that can occur during dashboard operations.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fetching events from the server failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// TUI-related error.
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),
}

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
