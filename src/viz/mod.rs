//! Plot layout: shared colour scale, marker sizing, and the ranked table.

mod options;
mod table;

pub use options::{PlotOptions, Resolution, TextColumn};
pub use table::{RankedTable, MAX_TABLE_ROWS};

use ratatui::style::Color;

use crate::error::TraceError;
use crate::map::Marker;
use crate::trace::CovidTrace;

/// Sequential red palette, light to dark
pub const REDS: [Color; 8] = [
    Color::Rgb(254, 224, 210),
    Color::Rgb(252, 187, 161),
    Color::Rgb(252, 146, 114),
    Color::Rgb(251, 106, 74),
    Color::Rgb(239, 59, 44),
    Color::Rgb(203, 24, 29),
    Color::Rgb(165, 15, 21),
    Color::Rgb(103, 0, 13),
];

/// Marker area per resident on the national map
pub const NATIONAL_MARKER_SCALE: f64 = 3.162_277_660_168_379_5e-5; // 10^-4.5
/// Marker area per resident on the zoomed map
pub const ZOOM_MARKER_SCALE: f64 = 1e-3;

/// Largest marker radius in braille pixels on the national map
const NATIONAL_MAX_RADIUS: i32 = 4;
/// Largest marker radius in braille pixels on the zoomed map
const ZOOM_MAX_RADIUS: i32 = 8;

/// Density range shared by every trace on a plot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorScale {
    /// Start from vmin = 1 and vmax = 0, then widen to cover every trace
    pub fn from_traces(traces: &[CovidTrace]) -> Self {
        let mut scale = Self { vmin: 1.0, vmax: 0.0 };
        for (lo, hi) in traces.iter().filter_map(|t| t.density_range()) {
            scale.vmin = scale.vmin.min(lo);
            scale.vmax = scale.vmax.max(hi);
        }
        scale
    }

    /// Position of a density within the scale, clamped to [0, 1]
    pub fn normalize(&self, density: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            return 0.0;
        }
        ((density - self.vmin) / span).clamp(0.0, 1.0)
    }

    /// Palette index for a density
    pub fn shade(&self, density: f64) -> usize {
        let t = self.normalize(density);
        ((t * REDS.len() as f64) as usize).min(REDS.len() - 1)
    }
}

/// Braille pixel radius for a marker whose area is `population * scale`
pub fn marker_radius(population: f64, scale: f64, max_radius: i32) -> i32 {
    let area = (population * scale).max(0.0);
    // Area is in square points; a braille dot is about four points across
    ((area.sqrt() / 4.0).round() as i32).clamp(0, max_radius)
}

/// Validated set of traces and options ready to draw
pub struct Plot {
    pub traces: Vec<CovidTrace>,
    pub options: PlotOptions,
    pub scale: ColorScale,
    /// 0-based index of the zoomed trace
    zoom: usize,
}

impl Plot {
    pub fn new(traces: Vec<CovidTrace>, options: PlotOptions) -> Result<Self, TraceError> {
        if options.zoom_index < 1 {
            return Err(TraceError::ZoomIndexTooSmall);
        }
        if traces.is_empty() {
            return Err(TraceError::NoTraces);
        }
        if options.zoom_index > traces.len() {
            return Err(TraceError::ZoomIndexOutOfRange {
                index: options.zoom_index,
                count: traces.len(),
            });
        }

        let scale = ColorScale::from_traces(&traces);
        let zoom = options.zoom_index - 1;
        Ok(Self {
            traces,
            options,
            scale,
            zoom,
        })
    }

    /// Trace shown in the zoomed map
    pub fn zoomed(&self) -> &CovidTrace {
        &self.traces[self.zoom]
    }

    /// 0-based index of the zoomed trace
    pub fn zoom_position(&self) -> usize {
        self.zoom
    }

    /// Zoom into the trace at a 0-based index; out-of-range indices are ignored
    pub fn set_zoom(&mut self, index: usize) {
        if index < self.traces.len() {
            self.zoom = index;
            self.options.zoom_index = index + 1;
        }
    }

    /// Step the zoomed trace forward or back, wrapping around
    pub fn cycle_zoom(&mut self, forward: bool) {
        let len = self.traces.len();
        let next = if forward { (self.zoom + 1) % len } else { (self.zoom + len - 1) % len };
        self.set_zoom(next);
    }

    /// Title of the national map, dated from the first trace
    pub fn title(&self) -> String {
        format!("Covid density map (Last updated: {})", format_date(&self.traces[0].updated_last))
    }

    /// Markers for every trace on the national map
    pub fn national_markers(&self) -> Vec<Marker> {
        self.traces
            .iter()
            .flat_map(|trace| self.markers(trace, NATIONAL_MARKER_SCALE, NATIONAL_MAX_RADIUS))
            .collect()
    }

    /// Markers for the zoomed trace
    pub fn zoom_markers(&self) -> Vec<Marker> {
        self.markers(self.zoomed(), ZOOM_MARKER_SCALE, ZOOM_MAX_RADIUS)
    }

    fn markers(&self, trace: &CovidTrace, size_scale: f64, max_radius: i32) -> Vec<Marker> {
        trace
            .rows()
            .iter()
            .map(|row| Marker {
                lon: row.position.lon,
                lat: row.position.lat,
                radius: marker_radius(row.population, size_scale, max_radius),
                shade: self.scale.shade(row.density),
            })
            .collect()
    }

    /// Ranked table for the zoomed trace
    pub fn table(&self) -> RankedTable {
        RankedTable::build(self.zoomed(), self.options.text, self.options.ascending)
    }

    pub fn toggle_order(&mut self) {
        self.options.ascending = !self.options.ascending;
    }

    pub fn cycle_text(&mut self) {
        self.options.text = self.options.text.next();
    }
}

/// Render an ISO date stamp for display, falling back to the raw text
pub fn format_date(stamp: &str) -> String {
    chrono::NaiveDate::parse_from_str(stamp, "%Y-%m-%d")
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| stamp.to_string())
}
