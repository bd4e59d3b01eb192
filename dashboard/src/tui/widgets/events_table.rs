//! The events table, newest first, with the selected row highlighted.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::tui::app::Theme;
use crate::view::TableRow;

const HEADERS: [&str; 5] = ["When", "Voltage", "Temperature", "Latitude", "Longitude"];

const WIDTHS: [Constraint; 5] = [
    Constraint::Min(34),
    Constraint::Length(9),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(12),
];

/// Table of formatted events.
#[derive(Debug)]
pub struct EventsTableWidget<'a> {
    rows: &'a [TableRow],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> EventsTableWidget<'a> {
    #[must_use]
    pub fn new(rows: &'a [TableRow], selected: usize, theme: &'a Theme) -> Self {
        Self {
            rows,
            selected,
            theme,
        }
    }
}

impl Widget for EventsTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Row::new(HEADERS.map(Cell::from)).style(self.theme.table_header);

        let rows = self.rows.iter().map(|row| {
            Row::new([
                Cell::from(row.time.as_str()),
                Cell::from(row.voltage.as_str()),
                Cell::from(row.temperature.as_str()),
                Cell::from(row.latitude.as_str()),
                Cell::from(row.longitude.as_str()),
            ])
            .style(self.theme.text_primary)
        });

        let table = Table::new(rows, WIDTHS)
            .header(header)
            .row_highlight_style(self.theme.table_selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border)
                    .title(Span::styled(
                        format!(" Events ({}) ", self.rows.len()),
                        self.theme.title,
                    )),
            );

        let mut state = TableState::default();
        if !self.rows.is_empty() {
            state.select(Some(self.selected.min(self.rows.len() - 1)));
        }
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(uid: &str, time: &str) -> TableRow {
        TableRow {
            uid: uid.to_string(),
            timestamp: 0,
            time: time.to_string(),
            voltage: "3.70V".to_string(),
            temperature: "21.5°C".to_string(),
            latitude: "42.000000".to_string(),
            longitude: "-71.000000".to_string(),
        }
    }

    fn render(rows: &[TableRow], selected: usize, height: u16) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, height);
        let mut buf = Buffer::empty(area);
        EventsTableWidget::new(rows, selected, &theme).render(area, &mut buf);
        buf
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_headers_and_rows_in_order() {
        let rows = vec![
            row("b", "Thu, Jan 01, 1970, 00:05:00 UTC"),
            row("a", "Thu, Jan 01, 1970, 00:01:40 UTC"),
        ];
        let buf = render(&rows, 0, 8);

        assert!(line(&buf, 0).contains("Events (2)"));
        let header = line(&buf, 1);
        for h in HEADERS {
            assert!(header.contains(h), "missing header {h}");
        }
        assert!(line(&buf, 2).contains("00:05:00"));
        assert!(line(&buf, 3).contains("00:01:40"));
        assert!(line(&buf, 2).contains("3.70V"));
        assert!(line(&buf, 2).contains("-71.000000"));
    }

    #[test]
    fn selected_row_is_highlighted() {
        let rows = vec![row("a", "first"), row("b", "second")];
        let buf = render(&rows, 1, 8);

        let theme = Theme::default();
        assert_eq!(buf[(1, 3)].bg, theme.table_selected.bg.unwrap());
        assert_ne!(buf[(1, 2)].bg, theme.table_selected.bg.unwrap());
    }

    #[test]
    fn out_of_range_selection_is_clamped() {
        let rows = vec![row("a", "only")];
        let buf = render(&rows, 10, 6);
        assert!(line(&buf, 2).contains("only"));
    }

    #[test]
    fn empty_table_renders_headers() {
        let buf = render(&[], 0, 5);
        assert!(line(&buf, 1).contains("When"));
    }
}
