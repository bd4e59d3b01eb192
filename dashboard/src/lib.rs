//! TrackFlow dashboard - terminal viewer for Notehub tracking events.
//!
//! Fetches the most recent events from a TrackFlow server and shows them as
//! a table, newest first, alongside a map of the tracker's path over a
//! selectable time window.
//!
//! # Modules
//!
//! - [`client`]: HTTP client for the server's events endpoint
//! - [`config`]: Configuration from environment variables and flags
//! - [`error`]: Error types for dashboard operations
//! - [`normalize`]: Resolving an event's effective timestamp
//! - [`print`]: Plain-text table for non-interactive use
//! - [`tui`]: Terminal user interface
//! - [`types`]: Event and result-count types
//! - [`utils`]: Display formatting
//! - [`view`]: Table rows, time window and map projection

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod print;
pub mod tui;
pub mod types;
pub mod utils;
pub mod view;

pub use client::{ClientError, EventsClient};
pub use config::{Config, ConfigError};
pub use error::{DashboardError, Result};
pub use types::{Event, EventCount};
