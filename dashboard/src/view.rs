//! Projections of the loaded event set onto the table and the map.
//!
//! Both views start from the same events but order them differently: the
//! table is newest first, the map oldest first so the path reads forward in
//! time. The map additionally honours the [`TimeRange`] selected with the
//! slider and drops events without coordinates; the table never filters.

use std::cmp::Reverse;

use crate::normalize::{resolve_timestamp, timestamp_secs};
use crate::types::Event;
use crate::utils::format::{
    format_coordinate, format_event_time, format_temperature, format_voltage, marker_date,
    marker_time,
};

/// Shown in place of the table when the server returned no events.
pub const NO_EVENTS_MESSAGE: &str =
    "No events found. Make sure your Notehub credentials are properly configured.";

/// Step count for a page move of a slider thumb.
pub const PAGE_STEPS: i64 = 10;

// =============================================================================
// Table
// =============================================================================

/// One formatted row of the events table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub uid: String,
    /// Resolved timestamp in seconds, kept for ordering and lookups.
    pub timestamp: i64,
    pub time: String,
    pub voltage: String,
    pub temperature: String,
    pub latitude: String,
    pub longitude: String,
}

impl TableRow {
    fn from_event(event: &Event) -> Self {
        Self {
            uid: event.uid.clone(),
            timestamp: timestamp_secs(event),
            time: format_event_time(resolve_timestamp(event)),
            voltage: format_voltage(event.voltage()),
            temperature: format_temperature(event.temperature()),
            latitude: format_coordinate(event.best_lat),
            longitude: format_coordinate(event.best_lon),
        }
    }
}

/// Events ordered newest first. Ties keep their input order.
pub fn sorted_descending(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| Reverse(timestamp_secs(event)));
    sorted
}

/// Events ordered oldest first. Ties keep their input order.
pub fn sorted_ascending(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| timestamp_secs(event));
    sorted
}

/// Formats every event as a table row, newest first.
pub fn table_rows(events: &[Event]) -> Vec<TableRow> {
    sorted_descending(events)
        .into_iter()
        .map(TableRow::from_event)
        .collect()
}

// =============================================================================
// Time range
// =============================================================================

/// Which end of the [`TimeRange`] the keyboard moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Thumb {
    #[default]
    Start,
    End,
}

impl Thumb {
    /// The other thumb.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// The `[start, end]` window of the map, bounded by the loaded events.
///
/// Always satisfies `min <= start <= end <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    min: i64,
    max: i64,
    start: i64,
    end: i64,
}

impl TimeRange {
    /// A range covering `[min, max]` fully. The bounds are swapped if reversed.
    pub fn new(min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            start: min,
            end: max,
        }
    }

    /// The full range of resolved timestamps, or `None` for no events.
    pub fn from_events(events: &[Event]) -> Option<Self> {
        let mut timestamps = events.iter().map(timestamp_secs);
        let first = timestamps.next()?;
        let (min, max) = timestamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Some(Self::new(min, max))
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Whether `timestamp` lies within `[start, end]`.
    pub fn contains(&self, timestamp: i64) -> bool {
        (self.start..=self.end).contains(&timestamp)
    }

    /// True when the window covers every loaded event.
    pub fn is_full(&self) -> bool {
        self.start == self.min && self.end == self.max
    }

    /// One keyboard step: 1% of the span, at least one second.
    pub fn step(&self) -> i64 {
        (self.max.saturating_sub(self.min) / 100).max(1)
    }

    /// Moves `thumb` by `steps` steps (negative moves earlier).
    ///
    /// The start thumb stays within `[min, end]` and the end thumb within
    /// `[start, max]`.
    pub fn move_thumb(&mut self, thumb: Thumb, steps: i64) {
        let delta = self.step().saturating_mul(steps);
        match thumb {
            Thumb::Start => {
                self.start = self.start.saturating_add(delta).clamp(self.min, self.end);
            }
            Thumb::End => {
                self.end = self.end.saturating_add(delta).clamp(self.start, self.max);
            }
        }
    }

    /// Restores the full range.
    pub fn reset(&mut self) {
        self.start = self.min;
        self.end = self.max;
    }

    /// Position of `timestamp` within `[min, max]` as a fraction in `0..=1`.
    pub fn fraction(&self, timestamp: i64) -> f64 {
        let span = self.max.saturating_sub(self.min);
        if span == 0 {
            return 0.0;
        }
        (timestamp.saturating_sub(self.min) as f64 / span as f64).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Map
// =============================================================================

/// One marker on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub uid: String,
    pub lat: f64,
    pub lon: f64,
    pub timestamp: i64,
    /// `Jan 1, 1970`
    pub date: String,
    /// `12:01 AM`
    pub time: String,
    pub temperature: Option<f64>,
    pub voltage: Option<f64>,
    /// First or last marker in the window; drawn bold.
    pub is_endpoint: bool,
}

impl MapPoint {
    /// The marker's popup text on a single line.
    pub fn detail_line(&self) -> String {
        format!(
            "Lat: {:.6}  Lon: {:.6}  Time: {} {}  Temp: {}  Voltage: {}  Event: {}",
            self.lat,
            self.lon,
            self.date,
            self.time,
            format_temperature(self.temperature),
            format_voltage(self.voltage),
            self.uid
        )
    }
}

/// Everything the map widget draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapView {
    /// Markers in ascending time order; the path runs through them in order.
    pub points: Vec<MapPoint>,
    /// Events inside the window, with or without coordinates.
    pub in_range: usize,
}

impl MapView {
    /// Builds the map for `events` restricted to `range` (all events if `None`).
    pub fn build(events: &[Event], range: Option<&TimeRange>) -> Self {
        let in_window: Vec<&Event> = sorted_ascending(events)
            .into_iter()
            .filter(|event| range.map_or(true, |r| r.contains(timestamp_secs(event))))
            .collect();

        let mut points: Vec<MapPoint> = in_window
            .iter()
            .filter_map(|event| {
                let (lat, lon) = event.coordinates()?;
                let timestamp = timestamp_secs(event);
                Some(MapPoint {
                    uid: event.uid.clone(),
                    lat,
                    lon,
                    timestamp,
                    date: marker_date(timestamp),
                    time: marker_time(timestamp),
                    temperature: event.temperature(),
                    voltage: event.voltage(),
                    is_endpoint: false,
                })
            })
            .collect();

        if let Some(first) = points.first_mut() {
            first.is_endpoint = true;
        }
        if let Some(last) = points.last_mut() {
            last.is_endpoint = true;
        }

        Self {
            points,
            in_range: in_window.len(),
        }
    }

    /// Where the map is centered: the earliest marker, else `(0, 0)`.
    pub fn center(&self) -> (f64, f64) {
        self.points.first().map_or((0.0, 0.0), |p| (p.lat, p.lon))
    }

    /// `(lat, lon)` pairs of the path, oldest first.
    pub fn path(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lat, p.lon)).collect()
    }

    /// Bounding box as `((min_lat, min_lon), (max_lat, max_lon))`.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?;
        let init = ((first.lat, first.lon), (first.lat, first.lon));
        Some(self.points.iter().fold(init, |((lo_lat, lo_lon), (hi_lat, hi_lon)), p| {
            (
                (lo_lat.min(p.lat), lo_lon.min(p.lon)),
                (hi_lat.max(p.lat), hi_lon.max(p.lon)),
            )
        }))
    }

    /// The marker for event `uid`, if it is on the map.
    pub fn point_for(&self, uid: &str) -> Option<&MapPoint> {
        self.points.iter().find(|p| p.uid == uid)
    }
}
