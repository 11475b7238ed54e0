use std::collections::HashMap;

use crate::geo::{normalize_lon, LatLon, EARTH_RADIUS_MILES};

/// Largest longitude still inside the last grid column
const MAX_LON: f64 = 179.999_999;

/// Spatial hash grid over point positions.
/// Stores indices into a caller-owned slice and answers conservative
/// radius queries: every point within the radius is returned, along with
/// some that are not.
pub struct SpatialGrid {
    /// Grid cells indexed by (cell_x, cell_y)
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// Cell size in degrees
    cell_size: f64,
    len: usize,
}

impl SpatialGrid {
    /// Create a new spatial grid with given cell size in degrees
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
            len: 0,
        }
    }

    /// Index positions by their slice order
    pub fn build(positions: impl Iterator<Item = LatLon>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, pos) in positions.enumerate() {
            grid.insert(idx, pos);
        }
        grid
    }

    /// Convert lon/lat to cell coordinates
    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (normalize_lon(lon) / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an index at a geographic position
    pub fn insert(&mut self, idx: usize, pos: LatLon) {
        let cell = self.to_cell(pos.lon, pos.lat);
        self.cells.entry(cell).or_default().push(idx);
        self.len += 1;
    }

    /// Indices in a bounding box that does not cross the antimeridian.
    /// Longitudes must already lie in [-180, 180).
    fn query_bbox_into(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64, results: &mut Vec<usize>) {
        let min_x = (min_lon / self.cell_size).floor() as i32;
        let max_x = (max_lon / self.cell_size).floor() as i32;
        let min_y = (min_lat / self.cell_size).floor() as i32;
        let max_y = (max_lat / self.cell_size).floor() as i32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
    }

    /// Candidate indices within `miles` of `center`.
    /// The bounding box of the spherical cap is exact, so no point inside
    /// the radius is missed. Callers still need an exact distance test.
    pub fn query_radius_miles(&self, center: LatLon, miles: f64) -> Vec<usize> {
        // Angular radius, padded against rounding at the boundary
        let r = miles / EARTH_RADIUS_MILES + 1e-9;
        let lat = center.lat.to_radians();

        let min_lat = (lat - r).to_degrees();
        let max_lat = (lat + r).to_degrees();
        let ratio = r.sin() / lat.cos();

        // Cap reaches a pole or wraps the globe
        if max_lat >= 90.0 || min_lat <= -90.0 || r >= std::f64::consts::PI || ratio >= 1.0 {
            return self.all();
        }

        let dlon = ratio.asin().to_degrees();
        let lon = normalize_lon(center.lon);
        let min_lon = lon - dlon;
        let max_lon = lon + dlon;

        let mut results = Vec::new();
        if min_lon < -180.0 {
            self.query_bbox_into(min_lon + 360.0, min_lat, MAX_LON, max_lat, &mut results);
            self.query_bbox_into(-180.0, min_lat, max_lon, max_lat, &mut results);
        } else if max_lon >= 180.0 {
            self.query_bbox_into(min_lon, min_lat, MAX_LON, max_lat, &mut results);
            self.query_bbox_into(-180.0, min_lat, max_lon - 360.0, max_lat, &mut results);
        } else {
            self.query_bbox_into(min_lon, min_lat, max_lon, max_lat, &mut results);
        }
        results
    }

    /// Every indexed position
    fn all(&self) -> Vec<usize> {
        let mut results: Vec<usize> = self.cells.values().flatten().copied().collect();
        results.sort_unstable();
        results
    }

    /// Number of indexed positions
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
