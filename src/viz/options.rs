use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Statistic;
use crate::error::TraceError;
use crate::map::Lod;
use crate::trace::TraceRow;

/// Basemap resolution for the zoomed map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Crude,
    #[default]
    Low,
    Intermediate,
    High,
    Full,
}

impl Resolution {
    const ALL: [Resolution; 5] = [
        Resolution::Crude,
        Resolution::Low,
        Resolution::Intermediate,
        Resolution::High,
        Resolution::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Crude => "crude",
            Resolution::Low => "low",
            Resolution::Intermediate => "intermediate",
            Resolution::High => "high",
            Resolution::Full => "full",
        }
    }

    /// Natural Earth detail level backing this resolution
    pub fn lod(&self) -> Lod {
        match self {
            Resolution::Crude | Resolution::Low => Lod::Low,
            Resolution::Intermediate => Lod::Medium,
            Resolution::High | Resolution::Full => Lod::High,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| TraceError::InvalidResolution(s.to_string()))
    }
}

/// Column shown beside county and state in the ranked table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextColumn {
    Latitude,
    Longitude,
    #[default]
    EstimatedPopulation,
    Density,
    Statistic(Statistic),
}

impl TextColumn {
    /// Every column, in the order the table cycles through them
    pub fn all() -> Vec<TextColumn> {
        let mut columns = vec![
            TextColumn::EstimatedPopulation,
            TextColumn::Density,
            TextColumn::Latitude,
            TextColumn::Longitude,
        ];
        columns.extend(Statistic::ALL.into_iter().map(TextColumn::Statistic));
        columns
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextColumn::Latitude => "latitude",
            TextColumn::Longitude => "longitude",
            TextColumn::EstimatedPopulation => "estimated_population",
            TextColumn::Density => "density",
            TextColumn::Statistic(stat) => stat.as_str(),
        }
    }

    /// Table header
    pub fn header(&self) -> String {
        match self {
            TextColumn::EstimatedPopulation => "Population".to_string(),
            other => {
                let name = other.as_str().replace('_', " ");
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    /// Formatted cell value for a row
    pub fn format(&self, row: &TraceRow) -> String {
        match self {
            TextColumn::Latitude => format!("{:.4}", row.position.lat),
            TextColumn::Longitude => format!("{:.4}", row.position.lon),
            TextColumn::EstimatedPopulation => format!("{:.0}", row.population),
            TextColumn::Density => format!("{:.5}", row.density),
            TextColumn::Statistic(stat) => row.stats.get(*stat).to_string(),
        }
    }

    /// The column after this one
    pub fn next(&self) -> TextColumn {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for TextColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextColumn {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TraceError::InvalidTextColumn(s.to_string()))
    }
}

impl TryFrom<String> for TextColumn {
    type Error = TraceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TextColumn> for String {
    fn from(column: TextColumn) -> Self {
        column.as_str().to_string()
    }
}

/// How a set of traces is plotted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// 1-based index of the trace drawn in the zoomed map
    pub zoom_index: usize,
    pub resolution: Resolution,
    pub text: TextColumn,
    pub ascending: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            zoom_index: 1,
            resolution: Resolution::Low,
            text: TextColumn::EstimatedPopulation,
            ascending: false,
        }
    }
}
