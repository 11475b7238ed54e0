//! Radius selection around a center county and per-capita density.

use tracing::debug;

use crate::data::{CountyKey, Dataset, Statistic, Statistics};
use crate::error::TraceError;
use crate::geo::{distance_miles, LatLon, MILES_PER_DEGREE};
use crate::states;

/// Extra miles around the radius when framing the zoomed map
pub const MARGIN_MILES: f64 = 20.0;

/// A county inside a trace
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRow {
    pub key: CountyKey,
    pub position: LatLon,
    pub population: f64,
    pub stats: Statistics,
    pub distance_miles: f64,
    /// Selected statistic per resident
    pub density: f64,
}

/// Lower-left and upper-right corners of a map frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    pub lower_left: LatLon,
    pub upper_right: LatLon,
}

/// Counties within a radius of a center county
#[derive(Clone, Debug)]
pub struct CovidTrace {
    pub center: CountyKey,
    pub center_position: LatLon,
    pub radius_miles: f64,
    pub statistic: Statistic,
    /// Date stamp of the case data
    pub updated_last: String,
    rows: Vec<TraceRow>,
}

/// Accept a two-letter code or a full state name, returning the code
pub fn normalize_state(state: &str) -> Result<String, TraceError> {
    let state = state.trim();
    if state.chars().count() > 2 {
        states::abbreviate(state)
            .map(str::to_string)
            .ok_or_else(|| TraceError::InvalidState(state.to_string()))
    } else {
        Ok(state.to_ascii_uppercase())
    }
}

impl CovidTrace {
    pub fn new(
        county: &str,
        state: &str,
        statistic: Statistic,
        radius_miles: f64,
        dataset: &Dataset,
    ) -> Result<Self, TraceError> {
        if !radius_miles.is_finite() || radius_miles < 0.0 {
            return Err(TraceError::InvalidRadius(radius_miles));
        }

        let state = normalize_state(state)?;
        let center = CountyKey::new(county.trim(), &state);

        if !dataset.cases.contains(&center) {
            return Err(TraceError::UnknownCounty {
                county: center.county,
                state: center.state,
            });
        }
        let center_position = dataset
            .counties
            .get(&center)
            .map(|c| c.position)
            .ok_or_else(|| TraceError::MissingCoordinates {
                county: center.county.clone(),
                state: center.state.clone(),
            })?;

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for county in dataset.counties_near(center_position, radius_miles) {
            let distance = distance_miles(county.position, center_position);
            if !(distance <= radius_miles) {
                continue;
            }

            // Counties missing from the case file count as zero
            let stats = dataset.cases.get(&county.key).copied().unwrap_or_default();
            let density = stats.get(statistic) as f64 / county.population;
            if !density.is_finite() {
                dropped += 1;
                continue;
            }

            rows.push(TraceRow {
                key: county.key.clone(),
                position: county.position,
                population: county.population,
                stats,
                distance_miles: distance,
                density,
            });
        }

        debug!(
            center = %center,
            radius_miles,
            counties = rows.len(),
            dropped,
            "Built trace"
        );

        Ok(Self {
            center,
            center_position,
            radius_miles,
            statistic,
            updated_last: dataset.cases.updated_last().to_string(),
            rows,
        })
    }

    /// Rows in county table order
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Frame around the center padded by the radius plus a margin
    pub fn corners(&self) -> Corners {
        let pad = (self.radius_miles + MARGIN_MILES) / MILES_PER_DEGREE;
        let LatLon { lat, lon } = self.center_position;
        Corners {
            lower_left: LatLon::new(lat - pad, lon - pad),
            upper_right: LatLon::new(lat + pad, lon + pad),
        }
    }

    /// Smallest and largest density, `None` for an empty trace
    pub fn density_range(&self) -> Option<(f64, f64)> {
        self.rows.iter().fold(None, |acc, row| match acc {
            None => Some((row.density, row.density)),
            Some((lo, hi)) => Some((lo.min(row.density), hi.max(row.density))),
        })
    }

    /// Rows sorted by density; ties keep table order
    pub fn ranked(&self, ascending: bool) -> Vec<&TraceRow> {
        let mut ranked: Vec<&TraceRow> = self.rows.iter().collect();
        if ascending {
            ranked.sort_by(|a, b| a.density.total_cmp(&b.density));
        } else {
            ranked.sort_by(|a, b| b.density.total_cmp(&a.density));
        }
        ranked
    }

    /// Short description for titles
    pub fn label(&self) -> String {
        format!("{} ({} mi, {})", self.center, self.radius_miles, self.statistic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_case_records, CaseTable, County, CountyTable};

    const CASES: &str = "\
date,county,state,fips,cases,deaths,confirmed_cases,confirmed_deaths,probable_cases,probable_deaths
2021-03-01,Alameda,California,06001,1000,10,,,,
2021-03-01,Contra Costa,California,06013,3000,30,,,,
2021-03-01,Sacramento,California,06067,500,5,,,,
2021-03-01,Empty,California,06999,50,0,,,,
2021-03-01,Los Angeles,California,06037,100000,2000,,,,
";

    const GEOCODES: &str = "\
zip,state,county,latitude,longitude,estimated_population
1,CA,Alameda,37.65,-121.91,10000
2,CA,Contra Costa,37.92,-121.95,10000
3,CA,Sacramento,38.30,-121.50,50000
4,CA,Empty,37.70,-121.80,0
5,CA,San Joaquin,37.93,-121.27,20000
6,CA,Los Angeles,34.32,-118.22,1000000
7,CA,Nocases,37.66,-121.90,100
";

    fn dataset() -> Dataset {
        let cases = CaseTable::from_records(read_case_records(CASES.as_bytes()).unwrap());
        let counties = CountyTable::from_reader(GEOCODES.as_bytes()).unwrap();
        Dataset::new(cases, counties)
    }

    #[test]
    fn test_selects_within_radius() {
        let trace = CovidTrace::new("Alameda", "CA", Statistic::Cases, 60.0, &dataset()).unwrap();
        let names: Vec<_> = trace.rows().iter().map(|r| r.key.county.as_str()).collect();
        // Empty has no population and is dropped; Los Angeles is too far
        assert_eq!(names, ["Alameda", "Contra Costa", "Nocases", "Sacramento", "San Joaquin"]);
        assert!(trace.rows().iter().all(|r| r.distance_miles <= 60.0));
    }

    #[test]
    fn test_density_and_zero_fill() {
        let trace = CovidTrace::new("Alameda", "California", Statistic::Cases, 60.0, &dataset()).unwrap();
        let find = |name: &str| trace.rows().iter().find(|r| r.key.county == name).unwrap();
        assert_eq!(find("Contra Costa").density, 0.3);
        assert_eq!(find("Sacramento").density, 0.01);
        // Present in geocodes only
        assert_eq!(find("San Joaquin").stats, Statistics::default());
        assert_eq!(find("San Joaquin").density, 0.0);
        assert_eq!(trace.updated_last, "2021-03-01");
    }

    #[test]
    fn test_zero_radius_keeps_center() {
        let trace = CovidTrace::new("Alameda", "ca", Statistic::Deaths, 0.0, &dataset()).unwrap();
        assert_eq!(trace.rows().len(), 1);
        assert_eq!(trace.rows()[0].density, 0.001);
        assert_eq!(trace.center.state, "CA");
    }

    #[test]
    fn test_invalid_inputs() {
        let data = dataset();
        assert_eq!(
            CovidTrace::new("Alameda", "Californa", Statistic::Cases, 10.0, &data).unwrap_err(),
            TraceError::InvalidState("Californa".into())
        );
        let err = CovidTrace::new("Atlantis", "CA", Statistic::Cases, 10.0, &data).unwrap_err();
        assert_eq!(err.to_string(), "Atlantis, CA not a valid county, state entry.");
        // In geocodes but not in the case file
        assert!(matches!(
            CovidTrace::new("San Joaquin", "CA", Statistic::Cases, 10.0, &data),
            Err(TraceError::UnknownCounty { .. })
        ));
        assert!(matches!(
            CovidTrace::new("Alameda", "CA", Statistic::Cases, -1.0, &data),
            Err(TraceError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_corners() {
        let trace = CovidTrace::new("Alameda", "CA", Statistic::Cases, 49.0, &dataset()).unwrap();
        let corners = trace.corners();
        assert!((corners.lower_left.lat - 36.65).abs() < 1e-9);
        assert!((corners.lower_left.lon - (-122.91)).abs() < 1e-9);
        assert!((corners.upper_right.lat - 38.65).abs() < 1e-9);
        assert!((corners.upper_right.lon - (-120.91)).abs() < 1e-9);
    }

    #[test]
    fn test_ranked_order() {
        let trace = CovidTrace::new("Alameda", "CA", Statistic::Cases, 60.0, &dataset()).unwrap();
        let top: Vec<_> = trace.ranked(false).iter().map(|r| r.key.county.clone()).collect();
        assert_eq!(top[0], "Contra Costa");
        assert_eq!(top[1], "Alameda");
        let bottom = trace.ranked(true);
        assert_eq!(bottom[0].density, 0.0);
        assert_eq!(trace.density_range(), Some((0.0, 0.3)));
    }

    #[test]
    fn test_unplaceable_county_excluded() {
        let cases = "date,county,state,fips,cases,deaths\n\
                     2021-03-01,Center,Nevada,,10,0\n\
                     2021-03-01,Drifting,Nevada,,10,0\n";
        let counties = CountyTable::new(vec![
            County {
                key: CountyKey::new("Center", "NV"),
                position: LatLon::new(0.2, 0.2),
                population: 100.0,
            },
            County {
                key: CountyKey::new("Drifting", "NV"),
                position: LatLon::new(f64::NAN, f64::NAN),
                population: 100.0,
            },
        ]);
        let data = Dataset::new(
            CaseTable::from_records(read_case_records(cases.as_bytes()).unwrap()),
            counties,
        );

        let trace = CovidTrace::new("Center", "NV", Statistic::Cases, 50.0, &data).unwrap();
        let names: Vec<_> = trace.rows().iter().map(|r| r.key.county.as_str()).collect();
        assert_eq!(names, ["Center"]);
    }
}
