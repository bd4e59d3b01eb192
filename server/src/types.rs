//! Notehub event types relayed by the TrackFlow server.
//!
//! Events are passed through to clients unchanged: only `uid` and `captured`
//! are required, every other field is optional, and unknown fields are kept
//! in [`Event::extra`] so nothing the upstream sends is lost in transit.
//!
//! A wrongly typed optional field is read as absent rather than failing the
//! whole page.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single tracking event as returned by the Notehub events API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub uid: String,

    /// Notefile the event was written to (e.g. `_track.qo`).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<String>,

    /// Capture time in seconds since the epoch.
    #[serde(deserialize_with = "string_or_number")]
    pub captured: String,

    /// Time the event reached Notehub.
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub received: Option<String>,

    /// Device-reported time in seconds since the epoch.
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub when: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_lat: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_lon: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_location: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_country: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub best_timezone: Option<String>,

    /// Open-ended payload written by the device firmware.
    #[serde(default)]
    pub body: Map<String, Value>,

    /// Any other top-level fields, relayed verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body of the Notehub events resource.
#[derive(Debug, Deserialize)]
pub struct NotehubEventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Successful response body of `GET /api/events/{timestamp}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
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
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Ok(None),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_deserializes_full_record() {
        let event: Event = serde_json::from_value(json!({
            "uid": "evt-1",
            "file": "_track.qo",
            "captured": "1700000000",
            "received": "1700000005",
            "when": "1699999990",
            "best_lat": 42.5,
            "best_lon": -71.25,
            "best_location": "Boston MA",
            "best_country": "US",
            "best_timezone": "America/New_York",
            "body": {"voltage": 4.1, "temperature": 21.5}
        }))
        .expect("should deserialize");

        assert_eq!(event.uid, "evt-1");
        assert_eq!(event.file.as_deref(), Some("_track.qo"));
        assert_eq!(event.when.as_deref(), Some("1699999990"));
        assert_eq!(event.best_lat, Some(42.5));
        assert_eq!(event.body.get("voltage"), Some(&json!(4.1)));
        assert!(event.extra.is_empty());
    }

    #[test]
    fn event_requires_only_uid_and_captured() {
        let event: Event = serde_json::from_value(json!({
            "uid": "evt-2",
            "captured": "1700000000"
        }))
        .expect("should deserialize");

        assert!(event.when.is_none());
        assert!(event.best_lat.is_none());
        assert!(event.body.is_empty());
    }

    #[test]
    fn event_missing_captured_is_rejected() {
        let result: Result<Event, _> = serde_json::from_value(json!({"uid": "evt-3"}));
        assert!(result.is_err());
    }

    #[test]
    fn numeric_timestamps_are_stringified() {
        let event: Event = serde_json::from_value(json!({
            "uid": "evt-4",
            "captured": 1700000000,
            "when": 1699999990
        }))
        .expect("should deserialize");

        assert_eq!(event.captured, "1700000000");
        assert_eq!(event.when.as_deref(), Some("1699999990"));
    }

    #[test]
    fn wrongly_typed_optional_fields_are_dropped() {
        let event: Event = serde_json::from_value(json!({
            "uid": "evt-6",
            "captured": "1",
            "file": 7,
            "when": {"nested": true},
            "received": [1, 2],
            "best_lat": "42.1",
            "best_lon": null,
            "best_location": false,
            "best_country": 1,
            "best_timezone": ["UTC"]
        }))
        .expect("should deserialize");

        assert!(event.file.is_none());
        assert!(event.when.is_none());
        assert!(event.received.is_none());
        assert!(event.best_lat.is_none());
        assert!(event.best_lon.is_none());
        assert!(event.best_location.is_none());
        assert!(event.best_country.is_none());
        assert!(event.best_timezone.is_none());
    }

    #[test]
    fn page_with_one_malformed_event_keeps_the_rest() {
        let page: NotehubEventsResponse = serde_json::from_value(json!({
            "events": [
                {"uid": "good", "captured": "1", "best_lat": 1.0, "best_lon": 1.0},
                {"uid": "odd", "captured": "2", "best_lat": "42.1", "best_lon": null}
            ]
        }))
        .expect("page should deserialize");

        assert_eq!(page.events.len(), 2);
        assert_eq!(page.events[0].best_lat, Some(1.0));
        assert_eq!(page.events[1].uid, "odd");
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let input = json!({
            "uid": "evt-5",
            "captured": "1",
            "device": "dev:864475040000000",
            "sn": "tracker-7"
        });
        let event: Event = serde_json::from_value(input).expect("should deserialize");
        assert_eq!(event.extra.get("device"), Some(&json!("dev:864475040000000")));

        let output = serde_json::to_value(&event).expect("should serialize");
        assert_eq!(output["sn"], json!("tracker-7"));
        assert_eq!(output["uid"], json!("evt-5"));
        assert!(output.get("when").is_none());
    }
}
