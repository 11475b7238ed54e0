use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TraceError;
use crate::states;

use super::CountyKey;

/// A case column that can be normalized into a density
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Cases,
    Deaths,
    ConfirmedCases,
    ConfirmedDeaths,
    ProbableCases,
    ProbableDeaths,
}

impl Statistic {
    pub const ALL: [Statistic; 6] = [
        Statistic::Cases,
        Statistic::Deaths,
        Statistic::ConfirmedCases,
        Statistic::ConfirmedDeaths,
        Statistic::ProbableCases,
        Statistic::ProbableDeaths,
    ];

    /// Column name in the case file
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Cases => "cases",
            Statistic::Deaths => "deaths",
            Statistic::ConfirmedCases => "confirmed_cases",
            Statistic::ConfirmedDeaths => "confirmed_deaths",
            Statistic::ProbableCases => "probable_cases",
            Statistic::ProbableDeaths => "probable_deaths",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| TraceError::InvalidStatistic(s.to_string()))
    }
}

/// The six case counts reported for one county
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub cases: u64,
    pub deaths: u64,
    pub confirmed_cases: u64,
    pub confirmed_deaths: u64,
    pub probable_cases: u64,
    pub probable_deaths: u64,
}

impl Statistics {
    pub fn get(&self, statistic: Statistic) -> u64 {
        match statistic {
            Statistic::Cases => self.cases,
            Statistic::Deaths => self.deaths,
            Statistic::ConfirmedCases => self.confirmed_cases,
            Statistic::ConfirmedDeaths => self.confirmed_deaths,
            Statistic::ProbableCases => self.probable_cases,
            Statistic::ProbableDeaths => self.probable_deaths,
        }
    }
}

/// One row of the county case file.
/// Counts that are blank or unparseable read as `None`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CaseRecord {
    pub date: String,
    pub county: String,
    pub state: String,
    #[serde(default)]
    pub fips: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub cases: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub confirmed_cases: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub confirmed_deaths: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub probable_cases: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub probable_deaths: Option<u64>,
}

impl CaseRecord {
    /// Counts with blanks filled as zero
    pub fn statistics(&self) -> Statistics {
        Statistics {
            cases: self.cases.unwrap_or(0),
            deaths: self.deaths.unwrap_or(0),
            confirmed_cases: self.confirmed_cases.unwrap_or(0),
            confirmed_deaths: self.confirmed_deaths.unwrap_or(0),
            probable_cases: self.probable_cases.unwrap_or(0),
            probable_deaths: self.probable_deaths.unwrap_or(0),
        }
    }

    /// Replace blank counts with explicit zeros
    pub fn zero_filled(mut self) -> Self {
        let stats = self.statistics();
        self.cases = Some(stats.cases);
        self.deaths = Some(stats.deaths);
        self.confirmed_cases = Some(stats.confirmed_cases);
        self.confirmed_deaths = Some(stats.confirmed_deaths);
        self.probable_cases = Some(stats.probable_cases);
        self.probable_deaths = Some(stats.probable_deaths);
        self
    }
}

/// Read case records from any CSV source with a header row.
/// Short rows are accepted; their missing counts read as blank.
pub fn read_case_records<R: Read>(reader: R) -> Result<Vec<CaseRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: CaseRecord = result.context("Failed to read case record")?;
        records.push(record);
    }
    Ok(records)
}

/// County case statistics indexed by (county, state code)
#[derive(Debug, Default)]
pub struct CaseTable {
    updated_last: String,
    records: HashMap<CountyKey, Statistics>,
}

impl CaseTable {
    /// Build the table from raw records, converting state names to codes
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        let updated_last = records.first().map(|r| r.date.clone()).unwrap_or_default();
        let mut table = HashMap::with_capacity(records.len());

        for record in records {
            let Some(code) = states::abbreviate(&record.state) else {
                warn!(state = %record.state, county = %record.county, "Skipping case row with unknown state");
                continue;
            };
            let key = CountyKey::new(&record.county, code);
            let stats = record.statistics();
            if table.contains_key(&key) {
                debug!(county = %key.county, state = %key.state, "Duplicate case row, keeping first");
                continue;
            }
            table.insert(key, stats);
        }

        Self {
            updated_last,
            records: table,
        }
    }

    /// Date stamp of the first row
    pub fn updated_last(&self) -> &str {
        &self.updated_last
    }

    pub fn get(&self, key: &CountyKey) -> Option<&Statistics> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &CountyKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load the cached case file
pub fn load_cases(path: &Path) -> Result<CaseTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open case file: {}", path.display()))?;
    let records = read_case_records(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse case file: {}", path.display()))?;
    let table = CaseTable::from_records(records);
    debug!(rows = table.len(), updated = table.updated_last(), "Loaded case table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,county,state,fips,cases,deaths,confirmed_cases,confirmed_deaths,probable_cases,probable_deaths
2021-03-01,Alameda,California,06001,80000,1200,,,,
2021-03-01,Clark,Nevada,32003,230000,3900,200000,3500,30000,400
2021-03-01,Nowhere,Atlantis,99999,1,0,0,0,0,0
2021-03-01,Wayne,Michigan,26163,90000,3000
";

    #[test]
    fn test_statistic_round_trip_names() {
        for stat in Statistic::ALL {
            assert_eq!(stat.as_str().parse::<Statistic>().unwrap(), stat);
        }
    }

    #[test]
    fn test_invalid_statistic() {
        let err = "hospitalized".parse::<Statistic>().unwrap_err();
        assert_eq!(err.to_string(), "hospitalized not a valid column.");
    }

    #[test]
    fn test_blank_counts_are_zero() {
        let records = read_case_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        let stats = records[0].statistics();
        assert_eq!(stats.cases, 80000);
        assert_eq!(stats.confirmed_cases, 0);
        assert_eq!(stats.probable_deaths, 0);
    }

    #[test]
    fn test_short_row_padded() {
        let records = read_case_records(SAMPLE.as_bytes()).unwrap();
        let wayne = records[3].statistics();
        assert_eq!(wayne.deaths, 3000);
        assert_eq!(wayne.probable_cases, 0);
    }

    #[test]
    fn test_table_indexes_by_code() {
        let table = CaseTable::from_records(read_case_records(SAMPLE.as_bytes()).unwrap());
        assert_eq!(table.updated_last(), "2021-03-01");
        // Atlantis is dropped
        assert_eq!(table.len(), 3);
        let clark = table.get(&CountyKey::new("Clark", "NV")).unwrap();
        assert_eq!(clark.get(Statistic::ProbableCases), 30000);
        assert!(!table.contains(&CountyKey::new("Clark", "Nevada")));
    }

    #[test]
    fn test_zero_filled() {
        let records = read_case_records(SAMPLE.as_bytes()).unwrap();
        let filled = records[0].clone().zero_filled();
        assert_eq!(filled.confirmed_cases, Some(0));
        assert_eq!(filled.cases, Some(80000));
    }
}
