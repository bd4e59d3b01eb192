//! TrackFlow Server - Notehub tracking event relay.
//!
//! This crate provides the server component of TrackFlow, responsible for:
//! - Authenticating against Notehub with OAuth2 client credentials
//! - Fetching the most recent `_track.qo` events for one project
//! - Serving those events to dashboards over a small JSON API
//!
//! # Architecture
//!
//! The server keeps no state beyond a cached bearer token. Every dashboard
//! request becomes exactly one upstream events request; results are never
//! cached.

pub mod config;
pub mod error;
pub mod notehub;
pub mod routes;
pub mod token;
pub mod types;
