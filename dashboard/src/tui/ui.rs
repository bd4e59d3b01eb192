//! Screen composition for the TrackFlow dashboard.
//!
//! ```text
//! header
//! body   --> match app.fetch_state() {
//!     Loading            --> "Loading events..."
//!     Error(message)     --> message
//!     Ready, no events   --> NO_EVENTS_MESSAGE
//!     Ready              --> slider / map / marker details / table
//! }
//! key hints
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{App, FetchState, Theme};
use crate::tui::widgets::{
    EventMapWidget, EventsTableWidget, HeaderWidget, KeyHintsWidget, TimeSliderWidget,
    HEADER_HEIGHT, KEY_HINTS_HEIGHT, TIME_SLIDER_HEIGHT,
};
use crate::view::{MapPoint, MapView, NO_EVENTS_MESSAGE};

pub const LOADING_MESSAGE: &str = "Loading events...";
const NO_MARKERS_MESSAGE: &str = "No events with coordinates in the selected time range";

/// Draws the whole screen for `app`.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let [header_area, body_area, hints_area] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(KEY_HINTS_HEIGHT),
    ])
    .areas(frame.area());

    frame.render_widget(
        HeaderWidget::new(app.fetch_state(), app.event_count(), theme)
            .loaded(app.events().len())
            .last_updated(app.last_updated())
            .spinner_frame(app.spinner_frame()),
        header_area,
    );

    match app.fetch_state() {
        FetchState::Loading => render_message(frame, body_area, LOADING_MESSAGE, theme.status_loading),
        FetchState::Error(message) => render_message(frame, body_area, message, theme.status_error),
        FetchState::Ready if app.rows().is_empty() => {
            render_message(frame, body_area, NO_EVENTS_MESSAGE, theme.text_secondary);
        }
        FetchState::Ready => render_events(frame, body_area, app, theme),
    }

    frame.render_widget(KeyHintsWidget::new(theme), hints_area);
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::styled(message.to_string(), style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

fn render_events(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let [slider_area, map_area, detail_area, table_area] = Layout::vertical([
        Constraint::Length(TIME_SLIDER_HEIGHT),
        Constraint::Min(8),
        Constraint::Length(1),
        Constraint::Percentage(40),
    ])
    .areas(area);

    if let Some(range) = app.time_range() {
        frame.render_widget(
            TimeSliderWidget::new(range, app.active_thumb(), theme),
            slider_area,
        );
    }

    let map = app.map_view();
    let selected_uid = app.selected_row().map(|row| row.uid.as_str());
    frame.render_widget(
        EventMapWidget::new(&map, theme).selected(selected_uid),
        map_area,
    );

    let detail = match selected_point(&map, selected_uid) {
        Some(point) => Line::styled(point.detail_line(), theme.text_primary),
        None => Line::styled(NO_MARKERS_MESSAGE, theme.text_muted),
    };
    frame.render_widget(Paragraph::new(detail), detail_area);

    frame.render_widget(
        EventsTableWidget::new(app.rows(), app.selected(), theme),
        table_area,
    );
}

/// The marker whose details are shown: the selected table row if it is on
/// the map, otherwise the latest marker.
pub fn selected_point<'a>(map: &'a MapView, selected_uid: Option<&str>) -> Option<&'a MapPoint> {
    selected_uid
        .and_then(|uid| map.point_for(uid))
        .or_else(|| map.points.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::Action;
    use crate::types::{Event, EventCount};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn draw(app: &App) -> String {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal.draw(|frame| render(frame, app, &theme)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn tracked_event(uid: &str, when: i64, lat: f64, lon: f64) -> Event {
        serde_json::from_value(json!({
            "uid": uid,
            "captured": when,
            "when": when,
            "best_lat": lat,
            "best_lon": lon,
            "body": {"voltage": 3.7, "temperature": 20.5}
        }))
        .unwrap()
    }

    fn ready_app(events: Vec<Event>) -> App {
        let mut app = App::new(EventCount::default());
        let req = app.begin_fetch();
        app.apply_fetch(req.seq, Ok(events));
        app
    }

    #[test]
    fn loading_screen() {
        let mut app = App::new(EventCount::default());
        app.begin_fetch();
        assert!(draw(&app).contains(LOADING_MESSAGE));
    }

    #[test]
    fn error_screen_shows_message() {
        let mut app = App::new(EventCount::default());
        let req = app.begin_fetch();
        app.apply_fetch(req.seq, Err("Failed to fetch events".to_string()));

        let screen = draw(&app);
        assert!(screen.contains("Failed to fetch events"));
        assert!(!screen.contains("Events ("));
    }

    #[test]
    fn empty_result_shows_guidance() {
        let app = ready_app(vec![]);
        assert!(draw(&app).contains("No events found."));
    }

    #[test]
    fn ready_screen_has_every_panel() {
        let app = ready_app(vec![
            tracked_event("a", 60, 42.0, -71.0),
            tracked_event("b", 120, 42.1, -71.1),
        ]);
        let screen = draw(&app);

        assert!(screen.contains("Time Range"));
        assert!(screen.contains("Map (2 of 2 in range)"));
        assert!(screen.contains("Events (2)"));
        assert!(screen.contains("Event: b"));
        assert!(screen.contains("3.70V"));
    }

    #[test]
    fn detail_follows_table_selection() {
        let mut app = ready_app(vec![
            tracked_event("a", 60, 42.0, -71.0),
            tracked_event("b", 120, 42.1, -71.1),
        ]);
        app.apply(Action::ScrollDown);

        assert!(draw(&app).contains("Event: a"));
    }

    #[test]
    fn detail_falls_back_to_latest_marker() {
        let map = MapView::build(
            &[
                tracked_event("a", 60, 1.0, 1.0),
                tracked_event("b", 120, 2.0, 2.0),
            ],
            None,
        );
        assert_eq!(selected_point(&map, Some("missing")).unwrap().uid, "b");
        assert_eq!(selected_point(&map, Some("a")).unwrap().uid, "a");
        assert!(selected_point(&MapView::default(), None).is_none());
    }

    #[test]
    fn narrowed_window_without_markers_says_so() {
        let mut app = ready_app(vec![
            tracked_event("a", 0, 1.0, 1.0),
            serde_json::from_value(json!({"uid": "b", "captured": 1000, "when": 1000})).unwrap(),
        ]);
        app.apply(Action::MoveThumb(1));

        assert!(draw(&app).contains(NO_MARKERS_MESSAGE));
    }
}
