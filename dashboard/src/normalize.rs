//! Timestamp resolution for tracking events.
//!
//! Devices report time in several places. [`resolve_timestamp`] picks the one
//! to display and sort by, in this order:
//!
//! 1. `body.when`, if it is a string
//! 2. `body.time`, if it is a string
//! 3. top-level `when`, if present and non-empty
//! 4. `captured`
//!
//! [`timestamp_secs`] turns the resolved string into seconds for ordering and
//! filtering. Strings that do not start with an integer count as 0.

use crate::types::Event;

/// Returns the timestamp string that best represents when `event` happened.
pub fn resolve_timestamp(event: &Event) -> &str {
    if let Some(when) = event.body_str("when") {
        return when;
    }
    if let Some(time) = event.body_str("time") {
        return time;
    }
    match event.when.as_deref() {
        Some(when) if !when.is_empty() => when,
        _ => &event.captured,
    }
}

/// Resolved timestamp in seconds since the epoch, or 0 if unparseable.
pub fn timestamp_secs(event: &Event) -> i64 {
    parse_leading_int(resolve_timestamp(event)).unwrap_or(0)
}

/// Parses the leading decimal integer of `s`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Digit runs too long for `i64` saturate. Returns `None`
/// if no digit follows.
pub fn parse_leading_int(s: &str) -> Option<i64> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Event {
        serde_json::from_value(value).expect("should deserialize")
    }

    #[test]
    fn body_when_wins() {
        let e = event(json!({
            "uid": "a",
            "captured": "1",
            "when": "2",
            "body": {"when": "1700000000", "time": "3"}
        }));
        assert_eq!(resolve_timestamp(&e), "1700000000");
    }

    #[test]
    fn empty_body_when_still_wins() {
        let e = event(json!({"uid": "a", "captured": "1", "when": "2", "body": {"when": ""}}));
        assert_eq!(resolve_timestamp(&e), "");
        assert_eq!(timestamp_secs(&e), 0);
    }

    #[test]
    fn numeric_body_when_is_skipped() {
        let e = event(json!({
            "uid": "a",
            "captured": "1",
            "body": {"when": 1700000000, "time": "1700000005"}
        }));
        assert_eq!(resolve_timestamp(&e), "1700000005");
    }

    #[test]
    fn top_level_when_used_without_body_fields() {
        let e = event(json!({"uid": "a", "captured": "1", "when": "1699999999"}));
        assert_eq!(resolve_timestamp(&e), "1699999999");
    }

    #[test]
    fn empty_top_level_when_falls_through_to_captured() {
        let e = event(json!({"uid": "a", "captured": "1700000100", "when": ""}));
        assert_eq!(resolve_timestamp(&e), "1700000100");
    }

    #[test]
    fn captured_is_the_last_resort() {
        let e = event(json!({"uid": "a", "captured": "1700000100"}));
        assert_eq!(resolve_timestamp(&e), "1700000100");
        assert_eq!(timestamp_secs(&e), 1_700_000_100);
    }

    #[test]
    fn unparseable_timestamp_is_zero() {
        let e = event(json!({"uid": "a", "captured": "yesterday"}));
        assert_eq!(timestamp_secs(&e), 0);
    }

    #[test]
    fn parse_leading_int_stops_at_first_non_digit() {
        assert_eq!(parse_leading_int("123abc"), Some(123));
        assert_eq!(parse_leading_int("1700000000.75"), Some(1_700_000_000));
        assert_eq!(parse_leading_int("  -42"), Some(-42));
        assert_eq!(parse_leading_int("+9"), Some(9));
    }

    #[test]
    fn parse_leading_int_rejects_non_numbers() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(" - 5"), None);
    }

    #[test]
    fn parse_leading_int_saturates_long_digit_runs() {
        assert_eq!(parse_leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-99999999999999999999"), Some(-i64::MAX));
    }
}
