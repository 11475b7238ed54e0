//! Run configuration.
//!
//! Settings come from an optional JSON file, then command-line flags override
//! them. Without a file the shipped demo traces are used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::Statistic;
use crate::scraper::LIVE_CASES_URL;
use crate::viz::{PlotOptions, Resolution, TextColumn};

/// Cached live case file name
const CASES_FILE: &str = "us-counties.csv";

/// Static zip-code geocode file name
const GEOCODES_FILE: &str = "Geocodes_USA_with_Counties.csv";

/// One trace to build: a center county, a radius, and the statistic to normalize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    pub county: String,
    /// Two-letter code or full state name
    pub state: String,
    #[serde(default = "default_statistic")]
    pub statistic: Statistic,
    pub radius_miles: f64,
}

fn default_statistic() -> Statistic {
    Statistic::Cases
}

impl TraceConfig {
    pub fn new(county: &str, state: &str, statistic: Statistic, radius_miles: f64) -> Self {
        Self {
            county: county.to_string(),
            state: state.to_string(),
            statistic,
            radius_miles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the case cache, geocodes, and basemap GeoJSON
    pub data_dir: PathBuf,
    pub cases_url: String,
    pub cases_file: String,
    pub geocodes_file: String,
    /// Log directory, defaults to the data directory
    pub log_dir: Option<PathBuf>,
    /// Skip the live freshness check
    pub offline: bool,
    pub traces: Vec<TraceConfig>,
    pub plot: PlotOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cases_url: LIVE_CASES_URL.to_string(),
            cases_file: CASES_FILE.to_string(),
            geocodes_file: GEOCODES_FILE.to_string(),
            log_dir: None,
            offline: false,
            traces: vec![
                TraceConfig::new("Alameda", "CA", Statistic::Cases, 60.0),
                TraceConfig::new("Los Angeles", "CA", Statistic::Cases, 100.0),
                TraceConfig::new("Clark", "NV", Statistic::Cases, 100.0),
            ],
            plot: PlotOptions::default(),
        }
    }
}

impl Config {
    /// Load from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn cases_path(&self) -> PathBuf {
        self.data_dir.join(&self.cases_file)
    }

    pub fn geocodes_path(&self) -> PathBuf {
        self.data_dir.join(&self.geocodes_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| self.data_dir.clone())
    }
}

/// Plot county COVID-19 density traces on a terminal map
#[derive(Debug, Parser)]
#[command(name = "covid-trace", version)]
pub struct Cli {
    /// JSON config file with traces and plot options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with the case cache, geocodes and basemap files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Use the cached case file without checking for updates
    #[arg(long)]
    pub offline: bool,

    /// Trace to zoom into, counting from 1
    #[arg(short, long)]
    pub zoom: Option<usize>,

    /// Zoomed basemap resolution: crude, low, intermediate, high or full
    #[arg(short, long)]
    pub resolution: Option<Resolution>,

    /// Column listed in the ranked table
    #[arg(short, long)]
    pub text: Option<TextColumn>,

    /// Rank counties from lowest density up
    #[arg(short, long)]
    pub ascending: bool,
}

impl Cli {
    /// Load the config file and apply flag overrides
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if self.offline {
            config.offline = true;
        }
        if let Some(zoom) = self.zoom {
            config.plot.zoom_index = zoom;
        }
        if let Some(resolution) = self.resolution {
            config.plot.resolution = resolution;
        }
        if let Some(text) = self.text {
            config.plot.text = text;
        }
        if self.ascending {
            config.plot.ascending = true;
        }
        Ok(config)
    }
}
