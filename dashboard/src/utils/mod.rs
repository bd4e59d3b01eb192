//! Utility modules for the TrackFlow dashboard.
//!
//! # Modules
//!
//! - [`format`]: Display formatting for timestamps and sensor readings

pub mod format;

pub use format::{
    format_coordinate, format_event_time, format_temperature, format_voltage, marker_date,
    marker_time, range_label, NOT_AVAILABLE,
};
