//! Event types consumed by the TrackFlow dashboard.
//!
//! These mirror what the TrackFlow server relays from Notehub. Deserialization
//! is deliberately lenient: only `uid` and `captured` are required, timestamps
//! may arrive as strings or numbers, and coordinates of the wrong JSON type are
//! treated as missing rather than failing the whole response.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A single tracking event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub uid: String,

    /// Notefile the event was written to.
    #[serde(default)]
    pub file: Option<String>,

    /// Capture time in seconds since the epoch.
    #[serde(deserialize_with = "string_or_number")]
    pub captured: String,

    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub received: Option<String>,

    /// Device-reported time in seconds since the epoch.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub when: Option<String>,

    /// Best known latitude in decimal degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub best_lat: Option<f64>,

    /// Best known longitude in decimal degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub best_lon: Option<f64>,

    #[serde(default)]
    pub best_location: Option<String>,

    #[serde(default)]
    pub best_country: Option<String>,

    #[serde(default)]
    pub best_timezone: Option<String>,

    /// Device payload; may hold `voltage`, `temperature`, `when`, `time`.
    #[serde(default)]
    pub body: Map<String, Value>,
}

impl Event {
    /// Battery voltage, if the body carries a numeric `voltage`.
    pub fn voltage(&self) -> Option<f64> {
        self.body.get("voltage").and_then(Value::as_f64)
    }

    /// Temperature in °C, if the body carries a numeric `temperature`.
    pub fn temperature(&self) -> Option<f64> {
        self.body.get("temperature").and_then(Value::as_f64)
    }

    /// Returns a body field only if it is a JSON string.
    pub fn body_str(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// `(lat, lon)` when both coordinates are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.best_lat?, self.best_lon?))
    }
}

/// Number of events requested from the server.
///
/// Only these page sizes are offered; the default is 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventCount {
    Ten,
    TwentyFive,
    #[default]
    Fifty,
    Hundred,
    TwoHundred,
}

impl EventCount {
    /// Every selectable count, smallest first.
    pub const ALL: [EventCount; 5] = [
        EventCount::Ten,
        EventCount::TwentyFive,
        EventCount::Fifty,
        EventCount::Hundred,
        EventCount::TwoHundred,
    ];

    /// The page size sent as `limit`.
    pub fn value(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
            Self::TwoHundred => 200,
        }
    }

    /// Looks up the count for a page size, if it is one of the offered sizes.
    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|count| count.value() == value)
    }

    /// Selects by position, `'1'` being the smallest.
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    /// Next larger count, wrapping to the smallest.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Next smaller count, wrapping to the largest.
    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|count| *count == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for EventCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} events", self.value())
    }
}

/// Successful response of `GET /api/events/{timestamp}`.
#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// Error response of the events endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> Event {
        serde_json::from_value(value).expect("should deserialize")
    }

    #[test]
    fn body_accessors_require_numbers() {
        let e = event(json!({
            "uid": "a",
            "captured": "1",
            "body": {"voltage": 4.1, "temperature": "warm"}
        }));

        assert_eq!(e.voltage(), Some(4.1));
        assert_eq!(e.temperature(), None);
    }

    #[test]
    fn integer_voltage_is_a_number() {
        let e = event(json!({"uid": "a", "captured": "1", "body": {"voltage": 4}}));
        assert_eq!(e.voltage(), Some(4.0));
    }

    #[test]
    fn body_str_ignores_non_strings() {
        let e = event(json!({
            "uid": "a",
            "captured": "1",
            "body": {"when": 1700000000, "time": "1700000001"}
        }));

        assert_eq!(e.body_str("when"), None);
        assert_eq!(e.body_str("time"), Some("1700000001"));
    }

    #[test]
    fn coordinates_need_both_axes() {
        let both = event(json!({"uid": "a", "captured": "1", "best_lat": 1.5, "best_lon": 2.5}));
        let lat_only = event(json!({"uid": "b", "captured": "1", "best_lat": 1.5}));

        assert_eq!(both.coordinates(), Some((1.5, 2.5)));
        assert_eq!(lat_only.coordinates(), None);
    }

    #[test]
    fn wrongly_typed_coordinates_are_missing() {
        let e = event(json!({"uid": "a", "captured": "1", "best_lat": "42.1", "best_lon": null}));
        assert_eq!(e.best_lat, None);
        assert_eq!(e.best_lon, None);
    }

    #[test]
    fn numeric_timestamps_become_strings() {
        let e = event(json!({"uid": "a", "captured": 1700000000, "when": 1699999999}));
        assert_eq!(e.captured, "1700000000");
        assert_eq!(e.when.as_deref(), Some("1699999999"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let e = event(json!({"uid": "a", "captured": "1", "device": "dev:1", "sn": 7}));
        assert_eq!(e.uid, "a");
    }

    #[test]
    fn event_count_defaults_to_fifty() {
        assert_eq!(EventCount::default().value(), 50);
        assert_eq!(EventCount::default().to_string(), "50 events");
    }

    #[test]
    fn event_count_cycles_in_both_directions() {
        assert_eq!(EventCount::Fifty.next(), EventCount::Hundred);
        assert_eq!(EventCount::TwoHundred.next(), EventCount::Ten);
        assert_eq!(EventCount::Ten.previous(), EventCount::TwoHundred);
        assert_eq!(EventCount::TwentyFive.previous(), EventCount::Ten);
    }

    #[test]
    fn event_count_lookup() {
        assert_eq!(EventCount::from_value(25), Some(EventCount::TwentyFive));
        assert_eq!(EventCount::from_value(30), None);
        assert_eq!(EventCount::from_digit('1'), Some(EventCount::Ten));
        assert_eq!(EventCount::from_digit('5'), Some(EventCount::TwoHundred));
        assert_eq!(EventCount::from_digit('0'), None);
        assert_eq!(EventCount::from_digit('6'), None);
        assert_eq!(EventCount::from_digit('x'), None);
    }

    #[test]
    fn error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert!(body.error.is_none());

        let body: ErrorBody = serde_json::from_value(json!({"error": "Failed to fetch events"})).unwrap();
        assert_eq!(body.error.as_deref(), Some("Failed to fetch events"));
    }
}
