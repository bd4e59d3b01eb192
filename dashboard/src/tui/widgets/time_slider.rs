//! Two-thumb slider selecting the map's time window.
//!
//! ```text
//! ┌ Time Range ────────────────────────────────────────────────┐
//! │▸ Start Time: Jan 1, 1970 12:01 AM    End Time: Jan 1, 1970 12:05 AM│
//! │───────●━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━●───────────────────│
//! └────────────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::Theme;
use crate::utils::format::range_label;
use crate::view::{Thumb, TimeRange};

/// Rows taken by the slider, borders included.
pub const TIME_SLIDER_HEIGHT: u16 = 4;

const THUMB: &str = "●";
const TRACK: &str = "─";
const SELECTED: &str = "━";
const ACTIVE_MARK: &str = "▸ ";

/// Slider widget over a [`TimeRange`].
#[derive(Debug)]
pub struct TimeSliderWidget<'a> {
    range: &'a TimeRange,
    active: Thumb,
    theme: &'a Theme,
}

impl<'a> TimeSliderWidget<'a> {
    #[must_use]
    pub fn new(range: &'a TimeRange, active: Thumb, theme: &'a Theme) -> Self {
        Self {
            range,
            active,
            theme,
        }
    }

    fn label(&self, thumb: Thumb) -> Vec<Span<'a>> {
        let (name, timestamp) = match thumb {
            Thumb::Start => ("Start Time: ", self.range.start()),
            Thumb::End => ("End Time: ", self.range.end()),
        };
        let (mark, style) = if thumb == self.active {
            (ACTIVE_MARK, self.theme.slider_thumb_active)
        } else {
            ("", self.theme.text_secondary)
        };
        vec![
            Span::styled(mark, style),
            Span::styled(name, style),
            Span::styled(range_label(timestamp), self.theme.text_primary),
        ]
    }

    fn labels_line(&self, width: usize) -> Line<'a> {
        let start = self.label(Thumb::Start);
        let end = self.label(Thumb::End);
        let used: usize = start.iter().chain(end.iter()).map(Span::width).sum();

        let mut spans = start;
        spans.push(Span::raw(" ".repeat(width.saturating_sub(used).max(1))));
        spans.extend(end);
        Line::from(spans)
    }

    /// Column of `timestamp` on a track `width` cells wide.
    fn column(&self, timestamp: i64, width: usize) -> usize {
        let last = width.saturating_sub(1) as f64;
        (self.range.fraction(timestamp) * last).round() as usize
    }

    fn track_line(&self, width: usize) -> Line<'a> {
        let start = self.column(self.range.start(), width);
        let end = self.column(self.range.end(), width);

        let thumb_style = |thumb: Thumb| -> Style {
            if thumb == self.active {
                self.theme.slider_thumb_active
            } else {
                self.theme.slider_thumb
            }
        };

        let spans = (0..width)
            .map(|col| {
                if col == start && col == end {
                    Span::styled(THUMB, self.theme.slider_thumb_active)
                } else if col == start {
                    Span::styled(THUMB, thumb_style(Thumb::Start))
                } else if col == end {
                    Span::styled(THUMB, thumb_style(Thumb::End))
                } else if col > start && col < end {
                    Span::styled(SELECTED, self.theme.slider_range)
                } else {
                    Span::styled(TRACK, self.theme.slider_track)
                }
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl Widget for TimeSliderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(" Time Range ", self.theme.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = usize::from(inner.width);
        Paragraph::new(vec![self.labels_line(width), self.track_line(width)]).render(inner, buf);
    }
}
