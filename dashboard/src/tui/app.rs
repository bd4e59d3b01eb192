//! Application state and event management for the TrackFlow dashboard.
//!
//! - [`App`]: fetch state machine plus everything the views need
//! - [`TuiEvent`]: events that drive the TUI loop
//! - [`EventHandler`]: async loop turning terminal input and timer ticks into [`TuiEvent`]s
//! - [`Theme`]: styles, with a monochrome variant for `NO_COLOR`
//!
//! # Fetch sequencing
//!
//! Every fetch the app asks for is tagged with a sequence number from
//! [`App::begin_fetch`]. Results come back as [`TuiEvent::FetchCompleted`]
//! and [`App::apply_fetch`] drops any whose sequence is not the latest, so a
//! slow response for an old result count can never overwrite a newer one.

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::tui::input::Action;
use crate::types::{Event, EventCount};
use crate::view::{table_rows, MapView, TableRow, Thumb, TimeRange, PAGE_STEPS};

// =============================================================================
// Fetch State
// =============================================================================

/// Where the current fetch stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// A request is in flight.
    #[default]
    Loading,
    /// The latest request failed; carries the message to show.
    Error(String),
    /// The latest request succeeded (possibly with no events).
    Ready,
}

/// A fetch the runtime should start on the app's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub count: EventCount,
}

/// Result of a fetch: the events, or a message for the error screen.
pub type FetchOutcome = Result<Vec<Event>, String>;

// =============================================================================
// Application State
// =============================================================================

/// Dashboard state.
///
/// All mutation goes through [`App::begin_fetch`], [`App::apply_fetch`],
/// [`App::apply`] and [`App::on_tick`], which keeps the state machine easy
/// to test without a terminal.
#[derive(Debug, Clone, Default)]
pub struct App {
    fetch_state: FetchState,
    event_count: EventCount,
    events: Vec<Event>,
    rows: Vec<TableRow>,
    time_range: Option<TimeRange>,
    active_thumb: Thumb,
    selected: usize,
    latest_request: u64,
    last_updated: Option<DateTime<Utc>>,
    spinner_frame: usize,
    should_quit: bool,
}

impl App {
    /// Creates an app that will request `event_count` events.
    pub fn new(event_count: EventCount) -> Self {
        Self {
            event_count,
            ..Self::default()
        }
    }

    /// Enters `Loading` and returns the request to issue.
    pub fn begin_fetch(&mut self) -> FetchRequest {
        self.latest_request += 1;
        self.fetch_state = FetchState::Loading;
        debug!(seq = self.latest_request, count = self.event_count.value(), "Starting fetch");
        FetchRequest {
            seq: self.latest_request,
            count: self.event_count,
        }
    }

    /// Applies a completed fetch if it answers the latest request.
    ///
    /// Returns `false` when the result was stale and ignored.
    pub fn apply_fetch(&mut self, seq: u64, outcome: FetchOutcome) -> bool {
        if seq != self.latest_request {
            debug!(seq, latest = self.latest_request, "Ignoring stale fetch result");
            return false;
        }

        match outcome {
            Ok(events) => {
                info!(count = events.len(), "Events loaded");
                self.rows = table_rows(&events);
                self.time_range = TimeRange::from_events(&events);
                self.events = events;
                self.active_thumb = Thumb::default();
                self.selected = 0;
                self.last_updated = Some(Utc::now());
                self.fetch_state = FetchState::Ready;
            }
            Err(message) => {
                warn!(error = %message, "Fetch failed");
                self.fetch_state = FetchState::Error(message);
            }
        }
        true
    }

    /// Applies a user action, returning a fetch to start if one is needed.
    pub fn apply(&mut self, action: Action) -> Option<FetchRequest> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Reload => Some(self.begin_fetch()),
            Action::NextCount => self.select_count(self.event_count.next()),
            Action::PreviousCount => self.select_count(self.event_count.previous()),
            Action::SelectCount(count) => self.select_count(count),
            Action::ScrollDown => {
                self.scroll_by(1);
                None
            }
            Action::ScrollUp => {
                self.scroll_by(-1);
                None
            }
            Action::ToggleThumb => {
                self.active_thumb = self.active_thumb.toggle();
                None
            }
            Action::MoveThumb(steps) => {
                if let Some(range) = self.time_range.as_mut() {
                    range.move_thumb(self.active_thumb, steps);
                }
                None
            }
            Action::PageThumb(pages) => {
                if let Some(range) = self.time_range.as_mut() {
                    range.move_thumb(self.active_thumb, pages.saturating_mul(PAGE_STEPS));
                }
                None
            }
            Action::ResetRange => {
                if let Some(range) = self.time_range.as_mut() {
                    range.reset();
                }
                None
            }
        }
    }

    /// Advances the loading animation. Returns `true` if a redraw is needed.
    pub fn on_tick(&mut self) -> bool {
        if self.fetch_state == FetchState::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            true
        } else {
            false
        }
    }

    fn select_count(&mut self, count: EventCount) -> Option<FetchRequest> {
        if count == self.event_count {
            return None;
        }
        self.event_count = count;
        Some(self.begin_fetch())
    }

    fn scroll_by(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch_state
    }

    pub fn event_count(&self) -> EventCount {
        self.event_count
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Table rows, newest first.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn time_range(&self) -> Option<&TimeRange> {
        self.time_range.as_ref()
    }

    pub fn active_thumb(&self) -> Thumb {
        self.active_thumb
    }

    /// Index of the highlighted table row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&TableRow> {
        self.rows.get(self.selected)
    }

    /// Sequence number of the most recent request.
    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The map for the current window.
    pub fn map_view(&self) -> MapView {
        MapView::build(&self.events, self.time_range.as_ref())
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Styles used across the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    pub status_loading: Style,
    pub status_error: Style,
    pub status_ready: Style,

    pub table_header: Style,
    pub table_selected: Style,

    /// Coastline outline behind the track.
    pub map_background: Style,
    pub map_path: Style,
    pub map_marker: Style,
    /// First and last marker labels.
    pub map_endpoint: Style,
    pub map_selected: Style,

    pub slider_track: Style,
    pub slider_range: Style,
    pub slider_thumb: Style,
    pub slider_thumb_active: Style,

    pub border: Style,
    pub title: Style,
    pub text_primary: Style,
    pub text_secondary: Style,
    pub text_muted: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_loading: Style::default().fg(Color::Yellow),
            status_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status_ready: Style::default().fg(Color::Green),

            table_header: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            table_selected: Style::default().bg(Color::DarkGray),

            map_background: Style::default().fg(Color::DarkGray),
            map_path: Style::default().fg(Color::Blue),
            map_marker: Style::default().fg(Color::Cyan),
            map_endpoint: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            map_selected: Style::default().fg(Color::Yellow),

            slider_track: Style::default().fg(Color::DarkGray),
            slider_range: Style::default().fg(Color::Blue),
            slider_thumb: Style::default().fg(Color::White),
            slider_thumb_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            border: Style::default().fg(Color::DarkGray),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            text_primary: Style::default(),
            text_secondary: Style::default().fg(Color::Gray),
            text_muted: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// A theme that uses only modifiers, per <https://no-color.org/>.
    #[must_use]
    pub fn monochrome() -> Self {
        Self {
            status_loading: Style::default().add_modifier(Modifier::ITALIC),
            status_error: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            status_ready: Style::default().add_modifier(Modifier::BOLD),

            table_header: Style::default().add_modifier(Modifier::BOLD),
            table_selected: Style::default().add_modifier(Modifier::REVERSED),

            map_background: Style::default().add_modifier(Modifier::DIM),
            map_path: Style::default(),
            map_marker: Style::default(),
            map_endpoint: Style::default().add_modifier(Modifier::BOLD),
            map_selected: Style::default().add_modifier(Modifier::REVERSED),

            slider_track: Style::default().add_modifier(Modifier::DIM),
            slider_range: Style::default(),
            slider_thumb: Style::default(),
            slider_thumb_active: Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),

            border: Style::default(),
            title: Style::default().add_modifier(Modifier::BOLD),
            text_primary: Style::default(),
            text_secondary: Style::default().add_modifier(Modifier::DIM),
            text_muted: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// [`Theme::monochrome`] if `NO_COLOR` is set, the default theme otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::monochrome()
        } else {
            Self::default()
        }
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Events that drive the TUI loop.
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Periodic tick for the loading animation.
    Tick,

    /// Key press.
    Key(KeyEvent),

    /// Terminal resized to (columns, rows).
    Resize(u16, u16),

    /// A fetch task finished.
    FetchCompleted { seq: u64, outcome: FetchOutcome },
}

/// Default tick rate for the event handler.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// How long one terminal poll may block.
const POLL_TIMEOUT_MS: u64 = 10;

/// Synchronous poll for one terminal event.
type PollFn = fn(Duration) -> Option<TuiEvent>;

/// Turns terminal input and a timer into [`TuiEvent`]s.
///
/// Runs in its own task until the shutdown signal fires or every receiver
/// is gone. Terminal polling is synchronous in crossterm, so each poll runs
/// on the blocking pool. At most one poll is in flight; a tick firing while
/// it runs does not discard it.
#[derive(Debug)]
pub struct EventHandler {
    event_tx: mpsc::Sender<TuiEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    tick_rate: Duration,
    poll: PollFn,
}

impl EventHandler {
    /// Creates a handler with the default tick rate.
    pub fn new(event_tx: mpsc::Sender<TuiEvent>, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self::with_tick_rate(event_tx, shutdown_rx, Duration::from_millis(DEFAULT_TICK_RATE_MS))
    }

    /// Creates a handler with a custom tick rate.
    pub fn with_tick_rate(
        event_tx: mpsc::Sender<TuiEvent>,
        shutdown_rx: oneshot::Receiver<()>,
        tick_rate: Duration,
    ) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            tick_rate,
            poll: poll_terminal_event,
        }
    }

    #[cfg(test)]
    fn with_poll(mut self, poll: PollFn) -> Self {
        self.poll = poll;
        self
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Runs until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking poll task panics.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut ticks = tokio::time::interval(self.tick_rate);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticks.tick().await;

        let poll = self.poll;
        let mut pending: Option<JoinHandle<Option<TuiEvent>>> = None;

        loop {
            let poll_task = pending.get_or_insert_with(|| {
                tokio::task::spawn_blocking(move || poll(Duration::from_millis(POLL_TIMEOUT_MS)))
            });

            tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    debug!("EventHandler received shutdown signal");
                    break;
                }

                polled = poll_task => {
                    pending = None;
                    match polled {
                        Ok(Some(event)) => {
                            if self.event_tx.send(event).await.is_err() {
                                debug!("Event receiver dropped, exiting event loop");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(join_error) => {
                            tracing::error!(error = %join_error, "Terminal polling task panicked");
                            return Err(std::io::Error::other("terminal polling task panicked"));
                        }
                    }
                }

                _ = ticks.tick() => {
                    if self.event_tx.send(TuiEvent::Tick).await.is_err() {
                        debug!("Event receiver dropped, exiting event loop");
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Polls crossterm once. Poll failures (no terminal) count as no event.
fn poll_terminal_event(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(event) => convert_crossterm_event(event),
            Err(e) => {
                tracing::trace!(error = %e, "Failed to read terminal event");
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            tracing::trace!(error = %e, "Failed to poll terminal");
            None
        }
    }
}

fn convert_crossterm_event(event: CrosstermEvent) -> Option<TuiEvent> {
    match event {
        CrosstermEvent::Key(key) => Some(TuiEvent::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
        CrosstermEvent::Mouse(_)
        | CrosstermEvent::FocusGained
        | CrosstermEvent::FocusLost
        | CrosstermEvent::Paste(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn event(uid: &str, when: &str) -> Event {
        serde_json::from_value(json!({"uid": uid, "captured": "0", "when": when}))
            .expect("valid event")
    }

    fn loaded_app(whens: &[&str]) -> App {
        let mut app = App::new(EventCount::default());
        let req = app.begin_fetch();
        let events = whens
            .iter()
            .enumerate()
            .map(|(i, w)| event(&format!("e{i}"), w))
            .collect();
        assert!(app.apply_fetch(req.seq, Ok(events)));
        app
    }

    // =========================================================================
    // Fetch state machine
    // =========================================================================

    #[test]
    fn app_starts_loading_with_default_count() {
        let app = App::new(EventCount::default());
        assert_eq!(app.fetch_state(), &FetchState::Loading);
        assert_eq!(app.event_count(), EventCount::Fifty);
        assert_eq!(app.latest_request(), 0);
    }

    #[test]
    fn successful_fetch_becomes_ready() {
        let app = loaded_app(&["100", "300", "200"]);

        assert_eq!(app.fetch_state(), &FetchState::Ready);
        let order: Vec<i64> = app.rows().iter().map(|r| r.timestamp).collect();
        assert_eq!(order, [300, 200, 100]);
        assert!(app.last_updated().is_some());

        let range = app.time_range().unwrap();
        assert_eq!((range.min(), range.max()), (100, 300));
    }

    #[test]
    fn empty_fetch_is_ready() {
        let app = loaded_app(&[]);
        assert_eq!(app.fetch_state(), &FetchState::Ready);
        assert!(app.rows().is_empty());
        assert!(app.time_range().is_none());
    }

    #[test]
    fn failed_fetch_carries_message() {
        let mut app = App::new(EventCount::default());
        let req = app.begin_fetch();
        app.apply_fetch(req.seq, Err("Failed to fetch events".to_string()));

        assert_eq!(
            app.fetch_state(),
            &FetchState::Error("Failed to fetch events".to_string())
        );
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut app = App::new(EventCount::Fifty);
        let first = app.begin_fetch();
        let second = app.apply(Action::SelectCount(EventCount::Ten)).unwrap();
        assert_eq!(second.count, EventCount::Ten);
        assert!(second.seq > first.seq);

        // The newer request answers first
        assert!(app.apply_fetch(second.seq, Ok(vec![event("new", "2")])));
        // Then the slow, older one
        assert!(!app.apply_fetch(first.seq, Ok(vec![event("old", "1"), event("old2", "3")])));

        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.rows()[0].uid, "new");
    }

    #[test]
    fn stale_error_does_not_replace_ready() {
        let mut app = App::new(EventCount::Fifty);
        let first = app.begin_fetch();
        let second = app.begin_fetch();

        app.apply_fetch(second.seq, Ok(vec![]));
        app.apply_fetch(first.seq, Err("boom".to_string()));

        assert_eq!(app.fetch_state(), &FetchState::Ready);
    }

    // =========================================================================
    // Actions
    // =========================================================================

    #[test]
    fn changing_count_reenters_loading() {
        let mut app = loaded_app(&["1"]);

        let req = app.apply(Action::NextCount).expect("should fetch");
        assert_eq!(req.count, EventCount::Hundred);
        assert_eq!(app.fetch_state(), &FetchState::Loading);

        let req = app.apply(Action::PreviousCount).expect("should fetch");
        assert_eq!(req.count, EventCount::Fifty);
    }

    #[test]
    fn selecting_current_count_does_nothing() {
        let mut app = loaded_app(&["1"]);
        assert!(app.apply(Action::SelectCount(EventCount::Fifty)).is_none());
        assert_eq!(app.fetch_state(), &FetchState::Ready);
    }

    #[test]
    fn reload_keeps_count() {
        let mut app = loaded_app(&["1"]);
        let before = app.latest_request();

        let req = app.apply(Action::Reload).expect("should fetch");
        assert_eq!(req.count, EventCount::Fifty);
        assert_eq!(req.seq, before + 1);
        assert_eq!(app.fetch_state(), &FetchState::Loading);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut app = loaded_app(&["1", "2", "3"]);

        app.apply(Action::ScrollUp);
        assert_eq!(app.selected(), 0);

        for _ in 0..10 {
            app.apply(Action::ScrollDown);
        }
        assert_eq!(app.selected(), 2);
        assert_eq!(app.selected_row().unwrap().timestamp, 1);
    }

    #[test]
    fn thumb_actions_move_the_range() {
        let mut app = loaded_app(&["0", "1000"]);

        app.apply(Action::MoveThumb(1));
        assert_eq!(app.time_range().unwrap().start(), 10);

        app.apply(Action::ToggleThumb);
        assert_eq!(app.active_thumb(), Thumb::End);
        app.apply(Action::PageThumb(-1));
        assert_eq!(app.time_range().unwrap().end(), 900);

        app.apply(Action::ResetRange);
        assert!(app.time_range().unwrap().is_full());
    }

    #[test]
    fn map_view_follows_range() {
        let mut app = App::new(EventCount::default());
        let req = app.begin_fetch();
        let events = vec![
            serde_json::from_value(json!({"uid": "a", "captured": "0", "when": "0", "best_lat": 1.0, "best_lon": 1.0})).unwrap(),
            serde_json::from_value(json!({"uid": "b", "captured": "0", "when": "1000", "best_lat": 2.0, "best_lon": 2.0})).unwrap(),
        ];
        app.apply_fetch(req.seq, Ok(events));
        assert_eq!(app.map_view().points.len(), 2);

        app.apply(Action::MoveThumb(1));
        let map = app.map_view();
        assert_eq!(map.points.len(), 1);
        assert_eq!(map.points[0].uid, "b");
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = App::new(EventCount::default());
        assert!(app.apply(Action::Quit).is_none());
        assert!(app.should_quit());
    }

    #[test]
    fn tick_animates_only_while_loading() {
        let mut app = App::new(EventCount::default());
        assert!(app.on_tick());
        assert_eq!(app.spinner_frame(), 1);

        let req = app.begin_fetch();
        app.apply_fetch(req.seq, Ok(vec![]));
        assert!(!app.on_tick());
    }

    // =========================================================================
    // Theme
    // =========================================================================

    #[test]
    fn monochrome_theme_has_no_colors() {
        let theme = Theme::monochrome();
        for style in [
            theme.status_error,
            theme.map_path,
            theme.map_endpoint,
            theme.slider_thumb_active,
            theme.table_selected,
        ] {
            assert!(style.fg.is_none());
            assert!(style.bg.is_none());
        }
    }

    // =========================================================================
    // Event handler
    // =========================================================================

    #[test]
    fn convert_key_and_resize_events() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(
            convert_crossterm_event(CrosstermEvent::Key(key)),
            Some(TuiEvent::Key(_))
        ));
        assert!(matches!(
            convert_crossterm_event(CrosstermEvent::Resize(80, 24)),
            Some(TuiEvent::Resize(80, 24))
        ));
        assert!(convert_crossterm_event(CrosstermEvent::FocusLost).is_none());
    }

    #[tokio::test]
    async fn event_handler_emits_ticks_and_stops_on_shutdown() {
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handler =
            EventHandler::with_tick_rate(event_tx, shutdown_rx, Duration::from_millis(20));
        assert_eq!(handler.tick_rate(), Duration::from_millis(20));

        let task = tokio::spawn(handler.run());

        let first = tokio::time::timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .expect("tick within timeout");
        assert!(matches!(first, Some(TuiEvent::Tick)));

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("handler should stop")
            .expect("task should not panic");
        assert!(result.is_ok());
    }

    fn slow_key_poll(_timeout: Duration) -> Option<TuiEvent> {
        std::thread::sleep(Duration::from_millis(30));
        Some(TuiEvent::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn event_handler_delivers_keys_polled_across_ticks() {
        let (event_tx, mut event_rx) = mpsc::channel(64);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        // Ticks fire several times while each poll is still blocking
        let handler = EventHandler::with_tick_rate(event_tx, shutdown_rx, Duration::from_millis(5))
            .with_poll(slow_key_poll);

        let task = tokio::spawn(handler.run());

        let key = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                match event_rx.recv().await {
                    Some(TuiEvent::Key(key)) => break key,
                    Some(_) => continue,
                    None => panic!("handler stopped before delivering a key"),
                }
            }
        })
        .await
        .expect("key should survive the ticks");
        assert_eq!(key.code, KeyCode::Char('x'));

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("handler should stop")
            .expect("task should not panic")
            .expect("handler should exit cleanly");
    }
}
