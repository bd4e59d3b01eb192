//! Map of the events in the selected window.
//!
//! Drawn on a ratatui [`Canvas`] with longitude on x and latitude on y. The
//! viewport is centered on the earliest marker and sized to fit every other
//! marker; with no markers it shows the whole world around `(0, 0)`.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as PathSegment, Map, MapResolution, Points},
        Block, Borders, Widget,
    },
};

use crate::tui::app::Theme;
use crate::view::{MapPoint, MapView};

/// Above this many markers only endpoints and the selected marker get labels.
pub const MAX_LABELLED_POINTS: usize = 20;

/// Smallest half-extent of the viewport in degrees.
const MIN_HALF_EXTENT: f64 = 0.01;

/// Extra room around the outermost markers.
const PADDING_FACTOR: f64 = 1.2;

/// Viewport as `(x_bounds, y_bounds)`, i.e. `([lon_min, lon_max], [lat_min, lat_max])`.
pub fn viewport(map: &MapView) -> ([f64; 2], [f64; 2]) {
    if map.points.is_empty() {
        return ([-180.0, 180.0], [-90.0, 90.0]);
    }

    let (center_lat, center_lon) = map.center();
    let (half_lat, half_lon) = map.points.iter().fold((0.0_f64, 0.0_f64), |(dy, dx), p| {
        (dy.max((p.lat - center_lat).abs()), dx.max((p.lon - center_lon).abs()))
    });
    let half_lat = (half_lat * PADDING_FACTOR).max(MIN_HALF_EXTENT);
    let half_lon = (half_lon * PADDING_FACTOR).max(MIN_HALF_EXTENT);

    (
        [center_lon - half_lon, center_lon + half_lon],
        [center_lat - half_lat, center_lat + half_lat],
    )
}

fn color_of(style: Style) -> Color {
    style.fg.unwrap_or(Color::Reset)
}

/// Map widget.
#[derive(Debug)]
pub struct EventMapWidget<'a> {
    map: &'a MapView,
    selected_uid: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> EventMapWidget<'a> {
    #[must_use]
    pub fn new(map: &'a MapView, theme: &'a Theme) -> Self {
        Self {
            map,
            selected_uid: None,
            theme,
        }
    }

    /// Highlights the marker for event `uid`, if it is on the map.
    #[must_use]
    pub fn selected(mut self, uid: Option<&'a str>) -> Self {
        self.selected_uid = uid;
        self
    }

    fn is_selected(&self, point: &MapPoint) -> bool {
        self.selected_uid == Some(point.uid.as_str())
    }

    /// Markers that get a date/time label.
    pub fn labelled(&self) -> Vec<&'a MapPoint> {
        let label_all = self.map.points.len() <= MAX_LABELLED_POINTS;
        self.map
            .points
            .iter()
            .filter(|p| label_all || p.is_endpoint || self.is_selected(p))
            .collect()
    }
}

impl Widget for EventMapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let title = format!(" Map ({} of {} in range) ", self.map.points.len(), self.map.in_range);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(title, self.theme.title));

        let (x_bounds, y_bounds) = viewport(self.map);
        let coords: Vec<(f64, f64)> = self.map.points.iter().map(|p| (p.lon, p.lat)).collect();
        let selected: Vec<(f64, f64)> = self
            .map
            .points
            .iter()
            .filter(|p| self.is_selected(p))
            .map(|p| (p.lon, p.lat))
            .collect();
        let labels: Vec<(f64, f64, Line<'static>)> = self
            .labelled()
            .into_iter()
            .map(|p| {
                let style = if p.is_endpoint {
                    self.theme.map_endpoint
                } else {
                    self.theme.map_marker
                };
                (p.lon, p.lat, Line::styled(format!("{} {}", p.date, p.time), style))
            })
            .collect();

        let theme = self.theme;
        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: color_of(theme.map_background),
                });
                ctx.layer();

                for pair in coords.windows(2) {
                    ctx.draw(&PathSegment {
                        x1: pair[0].0,
                        y1: pair[0].1,
                        x2: pair[1].0,
                        y2: pair[1].1,
                        color: color_of(theme.map_path),
                    });
                }
                ctx.draw(&Points {
                    coords: &coords,
                    color: color_of(theme.map_marker),
                });
                ctx.draw(&Points {
                    coords: &selected,
                    color: color_of(theme.map_selected),
                });

                for (x, y, label) in &labels {
                    ctx.print(*x, *y, label.clone());
                }
            })
            .render(area, buf);
    }
}
