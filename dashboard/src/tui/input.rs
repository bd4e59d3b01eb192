//! Keyboard handling: maps key presses to [`Action`]s.
//!
//! | Key | Action |
//! |-----|--------|
//! | `q`, `Esc`, `Ctrl+C` | Quit |
//! | `r` | Reload with the current count |
//! | `+` / `=`, `-` | Next / previous result count |
//! | `1`-`5` | Pick 10, 25, 50, 100 or 200 events |
//! | `j` / `Down`, `k` / `Up` | Move the table selection |
//! | `Tab` | Switch the active slider thumb |
//! | `Left` / `Right` | Move the active thumb one step |
//! | `PageUp` / `PageDown` | Move the active thumb one page |
//! | `Home` | Reset the time range |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::EventCount;

/// Something the user asked the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Reload,
    NextCount,
    PreviousCount,
    SelectCount(EventCount),
    ScrollUp,
    ScrollDown,
    ToggleThumb,
    /// Move the active thumb by this many steps.
    MoveThumb(i64),
    /// Move the active thumb by this many pages.
    PageThumb(i64),
    ResetRange,
}

/// Maps a key event to an action. Only presses produce actions.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::NextCount,
        KeyCode::Char('-') => Action::PreviousCount,
        KeyCode::Char(digit @ '1'..='5') => Action::SelectCount(EventCount::from_digit(digit)?),
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Tab => Action::ToggleThumb,
        KeyCode::Left => Action::MoveThumb(-1),
        KeyCode::Right => Action::MoveThumb(1),
        KeyCode::PageDown => Action::PageThumb(-1),
        KeyCode::PageUp => Action::PageThumb(1),
        KeyCode::Home => Action::ResetRange,
        _ => return None,
    };
    Some(action)
}
