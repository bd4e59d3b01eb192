//! Display formatting for timestamps and sensor readings.
//!
//! All times are rendered in UTC. Missing readings render as [`NOT_AVAILABLE`].
//!
//! # Example
//!
//! ```
//! use trackflow_dashboard::utils::format::{format_event_time, format_voltage};
//!
//! assert_eq!(format_event_time("0"), "Thu, Jan 01, 1970, 00:00:00 UTC");
//! assert_eq!(format_voltage(Some(4.126)), "4.13V");
//! assert_eq!(format_voltage(None), "N/A");
//! ```

use chrono::{DateTime, Utc};

/// Placeholder for any value that is absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown when a timestamp falls outside the representable range.
const INVALID_DATE: &str = "Invalid Date";

const TABLE_TIME_FORMAT: &str = "%a, %b %d, %Y, %H:%M:%S UTC";
const MARKER_DATE_FORMAT: &str = "%b %-d, %Y";
const MARKER_TIME_FORMAT: &str = "%I:%M %p";

/// Formats a resolved timestamp string for the events table.
///
/// The leading decimal number of `raw` is read as seconds (fractions are
/// floored). Empty input yields `N/A`; input that is not a number, or is out
/// of range, is returned unchanged.
pub fn format_event_time(raw: &str) -> String {
    if raw.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let Some(seconds) = parse_leading_float(raw) else {
        return raw.to_string();
    };

    // `as` saturates, and saturated values are rejected below
    match DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0) {
        Some(time) => time.format(TABLE_TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `4.10V`, or `N/A`.
pub fn format_voltage(voltage: Option<f64>) -> String {
    voltage.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}V"))
}

/// `21.4°C`, or `N/A`.
pub fn format_temperature(temperature: Option<f64>) -> String {
    temperature.map_or_else(|| NOT_AVAILABLE.to_string(), |t| format!("{t:.1}°C"))
}

/// Six decimal places, or `N/A`.
pub fn format_coordinate(degrees: Option<f64>) -> String {
    degrees.map_or_else(|| NOT_AVAILABLE.to_string(), |d| format!("{d:.6}"))
}

/// Marker date label, e.g. `Jan 1, 1970`.
pub fn marker_date(secs: i64) -> String {
    format_secs(secs, MARKER_DATE_FORMAT)
}

/// Marker time label, e.g. `12:01 AM`.
pub fn marker_time(secs: i64) -> String {
    format_secs(secs, MARKER_TIME_FORMAT)
}

/// Time range thumb label, e.g. `Jan 1, 1970 12:01 AM`.
pub fn range_label(secs: i64) -> String {
    format!("{} {}", marker_date(secs), marker_time(secs))
}

fn format_secs(secs: i64, format: &str) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map_or_else(|| INVALID_DATE.to_string(), |t| t.format(format).to_string())
}

/// Reads the longest leading decimal number of `s`, allowing a sign, a
/// fraction and an exponent.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
