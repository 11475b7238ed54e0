use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_circle, draw_line, draw_marker};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for basemap data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - national view
    Medium, // 50m - regional
    High,   // 10m - county scale
}

/// Line features kept per level of detail
#[derive(Default)]
pub struct LodLayer {
    low: Vec<LineString>,
    medium: Vec<LineString>,
    high: Vec<LineString>,
}

impl LodLayer {
    pub fn add(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.low.push(line),
            Lod::Medium => self.medium.push(line),
            Lod::High => self.high.push(line),
        }
    }

    /// Lines at the requested detail, falling back to coarser data when missing
    pub fn get(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.high.is_empty() => &self.high,
            Lod::High | Lod::Medium if !self.medium.is_empty() => &self.medium,
            _ => &self.low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.medium.is_empty() && self.high.is_empty()
    }
}

/// A county point to draw, already assigned a colour shade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    /// Radius in braille pixels
    pub radius: i32,
    /// Index into the colour palette
    pub shade: usize,
}

/// Display settings for basemap layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_states: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_states: true,
        }
    }
}

/// Rendered canvases, one per colour
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub states: BrailleCanvas,
    /// Marker canvases indexed by shade
    pub markers: Vec<BrailleCanvas>,
    /// Cross at the trace center
    pub center: BrailleCanvas,
}

/// Basemap outlines plus marker rasterization
pub struct MapRenderer {
    pub coastlines: LodLayer,
    pub borders: LodLayer,
    pub states: LodLayer,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines: LodLayer::default(),
            borders: LodLayer::default(),
            states: LodLayer::default(),
            settings: DisplaySettings::default(),
        }
    }

    /// Render basemap and markers into a `width` x `height` character area
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        lod: Lod,
        markers: &[Marker],
        shades: usize,
        center: Option<(f64, f64)>,
    ) -> MapLayers {
        let mut layers = MapLayers {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            states: BrailleCanvas::new(width, height),
            markers: (0..shades).map(|_| BrailleCanvas::new(width, height)).collect(),
            center: BrailleCanvas::new(width, height),
        };

        if self.settings.show_coastlines {
            for line in self.coastlines.get(lod) {
                draw_linestring(&mut layers.coastlines, line, viewport);
            }
        }

        if self.settings.show_borders {
            for line in self.borders.get(lod) {
                draw_linestring(&mut layers.borders, line, viewport);
            }
        }

        if self.settings.show_states {
            for line in self.states.get(lod) {
                draw_linestring(&mut layers.states, line, viewport);
            }
        }

        for marker in markers {
            let (px, py) = viewport.project(marker.lon, marker.lat);
            if !viewport.is_visible(px, py) {
                continue;
            }
            if let Some(canvas) = layers.markers.get_mut(marker.shade) {
                draw_circle(canvas, px, py, marker.radius);
            }
        }

        if let Some((lon, lat)) = center {
            let (px, py) = viewport.project(lon, lat);
            draw_marker(&mut layers.center, px, py, 2);
        }

        layers
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        self.coastlines.add(line, lod);
    }

    /// Add country border data at a specific LOD
    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        self.borders.add(line, lod);
    }

    /// Add state/province border data at a specific LOD
    pub fn add_state(&mut self, line: LineString, lod: Lod) {
        self.states.add(line, lod);
    }

    /// Check if any coastline data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines.is_empty()
    }

    /// Toggle country borders
    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    /// Toggle state/province borders
    pub fn toggle_states(&mut self) {
        self.settings.show_states = !self.settings.show_states;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            // Segments spanning the whole canvas are antimeridian jumps
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        // 10 chars x 5 chars = 20 x 20 pixels, 1 pixel per degree around (0, 0)
        Viewport::new(0.0, 0.0, 1.0, 20, 20)
    }

    #[test]
    fn test_lod_fallback() {
        let mut layer = LodLayer::default();
        layer.add(vec![(0.0, 0.0), (1.0, 1.0)], Lod::Low);
        assert_eq!(layer.get(Lod::High).len(), 1);

        layer.add(vec![(0.0, 0.0), (2.0, 2.0)], Lod::Medium);
        layer.add(vec![(0.0, 0.0), (3.0, 3.0)], Lod::Medium);
        assert_eq!(layer.get(Lod::High).len(), 2);
        assert_eq!(layer.get(Lod::Low).len(), 1);
    }

    #[test]
    fn test_markers_land_in_their_shade() {
        let renderer = MapRenderer::new();
        let markers = [
            Marker { lon: 0.0, lat: 0.0, radius: 0, shade: 1 },
            Marker { lon: 500.0, lat: 0.0, radius: 0, shade: 0 },
        ];
        let layers = renderer.render(10, 5, &viewport(), Lod::Low, &markers, 2, None);
        assert!(layers.markers[0].is_empty());
        assert!(!layers.markers[1].is_empty());
    }

    #[test]
    fn test_hidden_layers_stay_blank() {
        let mut renderer = MapRenderer::new();
        renderer.add_state(vec![(-5.0, 0.0), (5.0, 0.0)], Lod::Low);
        renderer.add_border(vec![(-5.0, 2.0), (5.0, 2.0)], Lod::Low);
        renderer.toggle_states();

        let layers = renderer.render(10, 5, &viewport(), Lod::Low, &[], 1, Some((0.0, 0.0)));
        assert!(layers.states.is_empty());
        assert!(!layers.borders.is_empty());
        assert!(!layers.center.is_empty());
    }
}
