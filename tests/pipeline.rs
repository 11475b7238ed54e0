//! End-to-end runs over fixture files written to a temp data directory.

use std::fs;
use std::path::Path;

use covid_trace::config::Config;
use covid_trace::data::{load_basemap, Dataset, Statistic};
use covid_trace::error::TraceError;
use covid_trace::map::{Lod, MapRenderer, Viewport};
use covid_trace::scraper::{self, CacheStatus};
use covid_trace::trace::CovidTrace;
use covid_trace::viz::{Plot, PlotOptions, TextColumn, MAX_TABLE_ROWS};

const LIVE: &str = "\
date,county,state,fips,cases,deaths,confirmed_cases,confirmed_deaths,probable_cases,probable_deaths
2021-03-02,Alameda,California,06001,80000,1200,,,,
2021-03-02,San Francisco,California,06075,35000,450,,,,
2021-03-02,Santa Clara,California,06085,110000,1900,,,,
2021-03-02,Sacramento,California,06067,95000,1500,,,,
2021-03-02,Los Angeles,California,06037,1200000,22000,,,,
2021-03-02,Clark,Nevada,32003,230000,3900,200000,3500,30000,400
2021-03-02,Nowhere,Atlantis,99999,1,1,,,,
";

const GEOCODES: &str = "\
zip,zip_type,primary_city,state,county,latitude,longitude,estimated_population
94501,STANDARD,Alameda,CA,Alameda,37.77,-122.26,500000
94536,STANDARD,Fremont,CA,Alameda,37.53,-121.99,1100000
94102,STANDARD,San Francisco,CA,San Francisco,37.78,-122.42,870000
95110,STANDARD,San Jose,CA,Santa Clara,37.34,-121.89,1900000
95814,STANDARD,Sacramento,CA,Sacramento,38.58,-121.49,1500000
90012,STANDARD,Los Angeles,CA,Los Angeles,34.06,-118.24,10000000
89101,STANDARD,Las Vegas,NV,Clark,36.17,-115.14,2200000
95937,STANDARD,Dunnigan,CA,Yolo,38.89,-121.97,0
";

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Geocodes_USA_with_Counties.csv"), GEOCODES).unwrap();
    dir
}

fn config(dir: &Path) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        offline: true,
        ..Config::default()
    }
}

#[test]
fn cache_then_trace_then_table() {
    let dir = data_dir();
    let config = config(dir.path());

    assert_eq!(scraper::update_cache(&config.cases_path(), LIVE).unwrap(), CacheStatus::Written);
    assert_eq!(scraper::update_cache(&config.cases_path(), LIVE).unwrap(), CacheStatus::UpToDate);

    let dataset = Dataset::load(&config.cases_path(), &config.geocodes_path()).unwrap();
    // Atlantis is dropped
    assert_eq!(dataset.cases.len(), 6);
    assert_eq!(dataset.cases.updated_last(), "2021-03-02");

    let traces: Vec<CovidTrace> = config
        .traces
        .iter()
        .map(|t| CovidTrace::new(&t.county, &t.state, t.statistic, t.radius_miles, &dataset).unwrap())
        .collect();

    // Sacramento is about 73 miles out
    let alameda: Vec<&str> = traces[0].rows().iter().map(|r| r.key.county.as_str()).collect();
    assert_eq!(alameda, ["Alameda", "San Francisco", "Santa Clara"]);
    assert!(traces[0].rows().iter().all(|r| r.distance_miles <= 60.0));

    let plot = Plot::new(traces, config.plot.clone()).unwrap();
    assert_eq!(plot.title(), "Covid density map (Last updated: Mar 2, 2021)");

    let table = plot.table();
    assert_eq!(table.headers, ["County".to_string(), "State".to_string(), "Population".to_string()]);
    assert!(table.rows.len() <= MAX_TABLE_ROWS);
    // Santa Clara 0.058, Alameda 0.05, San Francisco 0.040
    let order: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(order, ["Santa Clara", "Alameda", "San Francisco"]);
    assert_eq!(table.rows[1][2], "1600000");
    assert!((plot.scale.vmin - 35000.0 / 870000.0).abs() < 1e-12);
    assert!((plot.scale.vmax - 0.12).abs() < 1e-12);
}

#[test]
fn zero_population_counties_are_dropped() {
    let dir = data_dir();
    let config = config(dir.path());
    scraper::update_cache(&config.cases_path(), LIVE).unwrap();
    let dataset = Dataset::load(&config.cases_path(), &config.geocodes_path()).unwrap();

    // Yolo sits inside the radius with no residents on file
    let trace = CovidTrace::new("Sacramento", "California", Statistic::Deaths, 40.0, &dataset).unwrap();
    assert!(trace.rows().iter().all(|r| r.key.county != "Yolo"));
    assert!(trace.rows().iter().all(|r| r.density.is_finite()));
}

#[test]
fn bad_inputs_report_domain_errors() {
    let dir = data_dir();
    let config = config(dir.path());
    scraper::update_cache(&config.cases_path(), LIVE).unwrap();
    let dataset = Dataset::load(&config.cases_path(), &config.geocodes_path()).unwrap();

    let err = CovidTrace::new("Alameda", "Californa", Statistic::Cases, 10.0, &dataset).unwrap_err();
    assert_eq!(err.to_string(), "Californa not a valid state name.");

    let err = CovidTrace::new("Yolo", "CA", Statistic::Cases, 10.0, &dataset).unwrap_err();
    assert_eq!(err.to_string(), "Yolo, CA not a valid county, state entry.");

    assert_eq!("active".parse::<Statistic>().unwrap_err().to_string(), "active not a valid column.");

    let trace = CovidTrace::new("clark", "nv", Statistic::Cases, 10.0, &dataset);
    assert!(matches!(trace, Err(TraceError::UnknownCounty { .. })));

    let trace = CovidTrace::new("Clark", "nv", Statistic::Cases, 10.0, &dataset).unwrap();
    let options = PlotOptions { zoom_index: 0, text: TextColumn::Density, ..Default::default() };
    assert_eq!(Plot::new(vec![trace], options).err(), Some(TraceError::ZoomIndexTooSmall));
}

#[test]
fn missing_cache_is_an_error() {
    let dir = data_dir();
    let config = config(dir.path());
    assert!(Dataset::load(&config.cases_path(), &config.geocodes_path()).is_err());
}

#[test]
fn basemap_loads_from_data_dir() {
    let dir = data_dir();
    fs::write(
        dir.path().join("ne_110m_coastline.json"),
        r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[-124.0, 40.0], [-70.0, 40.0]]}}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("ne_50m_states.json"), "not json").unwrap();

    let mut renderer = MapRenderer::new();
    load_basemap(&mut renderer, dir.path());
    assert!(renderer.has_data());
    assert!(renderer.states.is_empty());

    let layers = renderer.render(40, 10, &Viewport::conus(80, 40), Lod::High, &[], 1, None);
    assert!(!layers.coastlines.is_empty());
}
