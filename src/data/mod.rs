use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::geo::LatLon;
use crate::map::SpatialGrid;

mod basemap;
mod cases;
mod counties;

pub use basemap::{generate_simple_us, load_basemap};
pub use cases::{load_cases, read_case_records, CaseRecord, CaseTable, Statistic, Statistics};
pub use counties::{load_counties, County, CountyTable};

/// Spatial index cell size in degrees
const GRID_CELL_DEGREES: f64 = 1.0;

/// Index key for a county: name plus two-letter state code
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountyKey {
    pub county: String,
    pub state: String,
}

impl CountyKey {
    pub fn new(county: &str, state: &str) -> Self {
        Self {
            county: county.to_string(),
            state: state.to_string(),
        }
    }
}

impl std::fmt::Display for CountyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.county, self.state)
    }
}

/// Case and county tables loaded together, with a spatial index over counties
pub struct Dataset {
    pub cases: CaseTable,
    pub counties: CountyTable,
    grid: SpatialGrid,
}

impl Dataset {
    pub fn new(cases: CaseTable, counties: CountyTable) -> Self {
        let grid = SpatialGrid::build(counties.iter().map(|c| c.position), GRID_CELL_DEGREES);
        Self { cases, counties, grid }
    }

    /// Load the cached case file and the geocode file
    pub fn load(cases_path: &Path, geocodes_path: &Path) -> Result<Self> {
        let cases = load_cases(cases_path)?;
        let counties = load_counties(geocodes_path)?;
        info!(cases = cases.len(), counties = counties.len(), "Dataset loaded");
        Ok(Self::new(cases, counties))
    }

    /// Counties that may lie within `miles` of `center`; a superset of the exact answer
    pub fn counties_near(&self, center: LatLon, miles: f64) -> impl Iterator<Item = &County> {
        let counties = self.counties.as_slice();
        let mut indices = self.grid.query_radius_miles(center, miles);
        // Keep table order so selections are deterministic
        indices.sort_unstable();
        indices.into_iter().map(move |idx| &counties[idx])
    }
}
