use crate::geo::LatLon;

/// Lower-left corner of the contiguous US view
pub const CONUS_LOWER_LEFT: LatLon = LatLon { lat: 23.2368, lon: -126.845 };
/// Upper-right corner of the contiguous US view
pub const CONUS_UPPER_RIGHT: LatLon = LatLon { lat: 50.1926, lon: -63.6515 };

/// Viewport for an equirectangular (cylindrical) map.
/// One degree of longitude and one of latitude cover the same number of pixels,
/// so the requested box is letterboxed into the canvas.
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude
    pub center_lon: f64,
    /// Center latitude
    pub center_lat: f64,
    /// Pixels per degree
    pub scale: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, scale: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            scale,
            width,
            height,
        }
    }

    /// Fit the box spanned by two corners into a canvas of the given pixel size
    pub fn fit(lower_left: LatLon, upper_right: LatLon, width: usize, height: usize) -> Self {
        let lon_span = (upper_right.lon - lower_left.lon).abs().max(f64::EPSILON);
        let lat_span = (upper_right.lat - lower_left.lat).abs().max(f64::EPSILON);
        let scale = (width as f64 / lon_span).min(height as f64 / lat_span);

        Self::new(
            (lower_left.lon + upper_right.lon) / 2.0,
            (lower_left.lat + upper_right.lat) / 2.0,
            scale,
            width,
            height,
        )
    }

    /// The contiguous United States
    pub fn conus(width: usize, height: usize) -> Self {
        Self::fit(CONUS_LOWER_LEFT, CONUS_UPPER_RIGHT, width, height)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let px = (lon - self.center_lon) * self.scale + self.width as f64 / 2.0;
        let py = (self.center_lat - lat) * self.scale + self.height as f64 / 2.0;
        (px.floor() as i32, py.floor() as i32)
    }

    /// Check if a projected point is visible in the viewport
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_north_is_up() {
        let vp = Viewport::new(0.0, 0.0, 2.0, 100, 100);
        let (_, y_north) = vp.project(0.0, 10.0);
        let (_, y_south) = vp.project(0.0, -10.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_fit_keeps_box_inside() {
        let vp = Viewport::conus(200, 80);
        let (x0, y0) = vp.project(CONUS_LOWER_LEFT.lon, CONUS_LOWER_LEFT.lat);
        let (x1, y1) = vp.project(CONUS_UPPER_RIGHT.lon, CONUS_UPPER_RIGHT.lat);
        assert!(vp.is_visible(x0, y0) && vp.is_visible(x1, y1));
        assert!(x0 < x1 && y1 < y0);
        assert!(x1 - x0 <= 200 && y0 - y1 <= 80);
    }
}
