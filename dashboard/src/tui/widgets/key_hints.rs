//! Single-line keybinding hints shown at the bottom of the screen.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::Theme;

pub const KEY_HINTS_HEIGHT: u16 = 1;

const HINTS: [(&str, &str); 8] = [
    ("q", "quit"),
    ("r", "reload"),
    ("+/-", "count"),
    ("1-5", "pick count"),
    ("j/k", "scroll"),
    ("Tab", "thumb"),
    ("←/→", "move"),
    ("Home", "reset range"),
];

/// Keybinding hints. Trailing hints are dropped when the line is too narrow.
#[derive(Debug)]
pub struct KeyHintsWidget<'a> {
    theme: &'a Theme,
}

impl<'a> KeyHintsWidget<'a> {
    #[must_use]
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for KeyHintsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let available = usize::from(area.width);
        let mut used = 0;
        let mut spans = Vec::new();
        for (key, action) in HINTS {
            let width = key.chars().count() + action.len() + 3;
            if used + width > available {
                break;
            }
            used += width;
            spans.push(Span::styled(format!(" {key}"), self.theme.title));
            spans.push(Span::styled(format!(" {action} "), self.theme.text_muted));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
