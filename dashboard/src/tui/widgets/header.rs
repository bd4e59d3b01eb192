//! Header bar: app title, selected result count and fetch status.
//!
//! ```text
//! ┌ TrackFlow ──────────────────────────────────────────────────────────┐
//! │View tracking events from Notehub projects    ◀ 50 events ▶  ● 42 loaded│
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::{FetchState, Theme};
use crate::types::EventCount;

/// Rows taken by the header, borders included.
pub const HEADER_HEIGHT: u16 = 3;

const TITLE: &str = " TrackFlow ";
const SUBTITLE: &str = "View tracking events from Notehub projects";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Header bar widget.
#[derive(Debug)]
pub struct HeaderWidget<'a> {
    fetch_state: &'a FetchState,
    event_count: EventCount,
    loaded: usize,
    last_updated: Option<DateTime<Utc>>,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> HeaderWidget<'a> {
    #[must_use]
    pub fn new(fetch_state: &'a FetchState, event_count: EventCount, theme: &'a Theme) -> Self {
        Self {
            fetch_state,
            event_count,
            loaded: 0,
            last_updated: None,
            spinner_frame: 0,
            theme,
        }
    }

    /// Number of events in the last successful fetch.
    #[must_use]
    pub fn loaded(mut self, loaded: usize) -> Self {
        self.loaded = loaded;
        self
    }

    #[must_use]
    pub fn last_updated(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_updated = at;
        self
    }

    #[must_use]
    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    fn status_spans(&self) -> Vec<Span<'a>> {
        match self.fetch_state {
            FetchState::Loading => vec![Span::styled(
                format!("{} loading", SPINNER[self.spinner_frame % SPINNER.len()]),
                self.theme.status_loading,
            )],
            FetchState::Error(_) => vec![Span::styled("✗ error", self.theme.status_error)],
            FetchState::Ready => {
                let mut spans = vec![Span::styled(
                    format!("● {} loaded", self.loaded),
                    self.theme.status_ready,
                )];
                if let Some(at) = self.last_updated {
                    spans.push(Span::styled(
                        format!(" at {}", at.format("%H:%M:%S UTC")),
                        self.theme.text_muted,
                    ));
                }
                spans
            }
        }
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(TITLE, self.theme.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut right = vec![
            Span::styled(format!("◀ {} ▶", self.event_count), self.theme.text_primary),
            Span::raw("  "),
        ];
        right.extend(self.status_spans());
        let right = Line::from(right);
        let right_width = u16::try_from(right.width()).unwrap_or(u16::MAX);

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)])
                .areas(inner);

        Paragraph::new(Span::styled(SUBTITLE, self.theme.text_secondary)).render(left_area, buf);
        Paragraph::new(right).render(right_area, buf);
    }
}
