//! Terminal user interface for the TrackFlow dashboard.
//!
//! # Architecture
//!
//! - **App** (`app`): state machine, theme and the input event loop
//! - **UI** (`ui`): screen layout
//! - **Input** (`input`): key to [`Action`](input::Action) mapping
//! - **Fetcher** (`fetcher`): background fetch tasks
//! - **Terminal** (`terminal`): raw mode and alternate screen handling
//! - **Widgets** (`widgets`): header, slider, map, table, key hints
//!
//! [`run`] wires them together: terminal input, ticks and fetch completions
//! all arrive on one channel, the app is updated, and the screen is redrawn.

pub mod app;
pub mod fetcher;
pub mod input;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use app::{App, FetchState, Theme, TuiEvent};
pub use terminal::{install_panic_hook, Tui};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::EventsClient;
use crate::config::Config;
use crate::error::{Result, TuiError};
use app::EventHandler;
use fetcher::Fetcher;

/// Capacity of the channel feeding the TUI loop.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to, or if the
/// HTTP client cannot be built.
pub async fn run(config: &Config) -> Result<()> {
    let client = EventsClient::new(&config.server_url)?;
    info!(server_url = %config.server_url, count = config.event_count.value(), "Starting dashboard");

    install_panic_hook();
    let mut tui = Tui::new().map_err(TuiError::TerminalInit)?;
    let theme = Theme::from_env();

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let input_task = tokio::spawn(EventHandler::new(event_tx.clone(), shutdown_rx).run());

    let mut app = App::new(config.event_count);
    let mut fetcher = Fetcher::new(client, event_tx);
    fetcher.start(app.begin_fetch());

    tui.draw(|frame| ui::render(frame, &app, &theme))
        .map_err(TuiError::Render)?;

    while let Some(event) = event_rx.recv().await {
        let redraw = match event {
            TuiEvent::Tick => app.on_tick(),
            TuiEvent::Key(key) => {
                if let Some(action) = input::action_for_key(key) {
                    debug!(?action, "Key action");
                    if let Some(request) = app.apply(action) {
                        fetcher.start(request);
                    }
                }
                true
            }
            TuiEvent::Resize(..) => true,
            TuiEvent::FetchCompleted { seq, outcome } => app.apply_fetch(seq, outcome),
        };

        if app.should_quit() {
            break;
        }
        if redraw {
            tui.draw(|frame| ui::render(frame, &app, &theme))
                .map_err(TuiError::Render)?;
        }
    }

    fetcher.abort();
    let _ = shutdown_tx.send(());
    if let Err(e) = input_task.await {
        debug!(error = %e, "Input task ended abnormally");
    }

    tui.restore().map_err(TuiError::Render)?;
    info!("Dashboard stopped");
    Ok(())
}
