//! Widgets for the TrackFlow dashboard.
//!
//! Each widget borrows what it draws plus the [`Theme`](crate::tui::app::Theme)
//! and implements ratatui's [`Widget`](ratatui::widgets::Widget) trait. State
//! lives in [`App`](crate::tui::app::App); widgets never mutate it.
//!
//! - [`header`]: title, result count and fetch status
//! - [`time_slider`]: two-thumb window over the loaded timestamps
//! - [`event_map`]: path and markers on a world map canvas
//! - [`events_table`]: events newest first
//! - [`key_hints`]: keybinding line

pub mod event_map;
pub mod events_table;
pub mod header;
pub mod key_hints;
pub mod time_slider;

pub use event_map::EventMapWidget;
pub use events_table::EventsTableWidget;
pub use header::{HeaderWidget, HEADER_HEIGHT};
pub use key_hints::{KeyHintsWidget, KEY_HINTS_HEIGHT};
pub use time_slider::{TimeSliderWidget, TIME_SLIDER_HEIGHT};
