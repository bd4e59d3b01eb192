//! Terminal setup and teardown for the TrackFlow dashboard.
//!
//! [`Tui`] owns a ratatui terminal in raw mode on the alternate screen and
//! puts the terminal back when dropped. [`install_panic_hook`] does the same
//! restoration from inside a panic so the message lands on the normal screen.
//! Call it once, before [`Tui::new`].

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Best-effort restoration used by the panic hook and [`Drop`].
fn reset_terminal() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Chains a panic hook that restores the terminal before the previous hook
/// prints the panic message.
pub fn install_panic_hook() {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        reset_terminal();
        previous_hook(info);
    }));
}

/// Raw-mode terminal on the alternate screen, restored on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl Tui {
    /// Enters raw mode and the alternate screen, hiding the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if any terminal setup step fails. Steps already taken
    /// are undone first.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
            reset_terminal();
        })?;

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Renders one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render).map(|_| ())
    }

    /// Puts the terminal back. Later calls, and the eventual drop, do nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if leaving the alternate screen or raw mode fails.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if !self.restored {
            reset_terminal();
        }
    }
}
