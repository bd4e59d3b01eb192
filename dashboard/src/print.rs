//! Plain-text table for the non-interactive `print` command.

use std::fmt::Write;

use crate::view::{TableRow, NO_EVENTS_MESSAGE};

const HEADERS: [&str; 5] = ["When", "Voltage", "Temperature", "Latitude", "Longitude"];

/// Formats `rows` as an aligned text table, or the no-events message.
pub fn format_table(rows: &[TableRow]) -> String {
    if rows.is_empty() {
        return format!("{NO_EVENTS_MESSAGE}\n");
    }

    let cells: Vec<[&str; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.time.as_str(),
                r.voltage.as_str(),
                r.temperature.as_str(),
                r.latitude.as_str(),
                r.longitude.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &HEADERS, &widths);
    for row in &cells {
        write_line(&mut out, row, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[&str; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
