use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::geo::LatLon;

use super::CountyKey;

/// One zip-code row of the geocode file; other columns are ignored
#[derive(Debug, Deserialize)]
struct GeocodeRow {
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    estimated_population: Option<f64>,
}

/// A county with its mean position and summed population
#[derive(Clone, Debug, PartialEq)]
pub struct County {
    pub key: CountyKey,
    pub position: LatLon,
    pub population: f64,
}

/// Running sums for one county; each coordinate averages over the rows that carry it
#[derive(Default)]
struct Accumulator {
    lat_sum: f64,
    lat_rows: usize,
    lon_sum: f64,
    lon_rows: usize,
    population: f64,
}

impl Accumulator {
    fn position(&self) -> Option<LatLon> {
        if self.lat_rows == 0 || self.lon_rows == 0 {
            return None;
        }
        Some(LatLon::new(
            self.lat_sum / self.lat_rows as f64,
            self.lon_sum / self.lon_rows as f64,
        ))
    }
}

/// Counties in (county, state) order with a key index
#[derive(Debug, Default)]
pub struct CountyTable {
    counties: Vec<County>,
    index: HashMap<CountyKey, usize>,
}

impl CountyTable {
    pub fn new(counties: Vec<County>) -> Self {
        let index = counties
            .iter()
            .enumerate()
            .map(|(idx, county)| (county.key.clone(), idx))
            .collect();
        Self { counties, index }
    }

    /// Group zip-code rows by (county, state), averaging positions and summing population.
    /// Rows without a coordinate still add their population; counties with no
    /// coordinates at all are dropped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut groups: BTreeMap<CountyKey, Accumulator> = BTreeMap::new();
        let mut skipped = 0usize;

        for result in rdr.deserialize() {
            let row: GeocodeRow = result.context("Failed to read geocode record")?;
            let (Some(county), Some(state)) = (row.county, row.state) else {
                skipped += 1;
                continue;
            };
            if county.is_empty() || state.is_empty() {
                skipped += 1;
                continue;
            }

            let acc = groups.entry(CountyKey::new(&county, &state)).or_default();
            if let Some(lat) = row.latitude.filter(|v| v.is_finite()) {
                acc.lat_sum += lat;
                acc.lat_rows += 1;
            }
            if let Some(lon) = row.longitude.filter(|v| v.is_finite()) {
                acc.lon_sum += lon;
                acc.lon_rows += 1;
            }
            acc.population += row.estimated_population.filter(|v| v.is_finite()).unwrap_or(0.0);
        }

        if skipped > 0 {
            debug!(skipped, "Skipped geocode rows without county or state");
        }

        let mut unplaced = 0usize;
        let counties: Vec<County> = groups
            .into_iter()
            .filter_map(|(key, acc)| match acc.position() {
                Some(position) => Some(County {
                    key,
                    position,
                    population: acc.population,
                }),
                None => {
                    unplaced += 1;
                    None
                }
            })
            .collect();

        if unplaced > 0 {
            debug!(unplaced, "Dropped counties without coordinates");
        }

        Ok(Self::new(counties))
    }

    pub fn get(&self, key: &CountyKey) -> Option<&County> {
        self.index.get(key).map(|&idx| &self.counties[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &County> {
        self.counties.iter()
    }

    pub fn as_slice(&self) -> &[County] {
        &self.counties
    }

    pub fn len(&self) -> usize {
        self.counties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }
}

/// Load the static geocode file
pub fn load_counties(path: &Path) -> Result<CountyTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open geocode file: {}", path.display()))?;
    let table = CountyTable::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse geocode file: {}", path.display()))?;
    debug!(counties = table.len(), "Loaded county table");
    Ok(table)
}
