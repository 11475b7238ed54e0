use thiserror::Error;

/// Errors raised while building or plotting traces
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error("{0} not a valid column.")]
    InvalidStatistic(String),

    #[error("{0} not a valid state name.")]
    InvalidState(String),

    #[error("{county}, {state} not a valid county, state entry.")]
    UnknownCounty { county: String, state: String },

    #[error("{county}, {state} has no geocode entry.")]
    MissingCoordinates { county: String, state: String },

    #[error("Radius must be a non-negative number of miles, got {0}.")]
    InvalidRadius(f64),

    #[error("Zoom indexing starts at 1.")]
    ZoomIndexTooSmall,

    #[error("Zoom index {index} out of range for {count} trace(s).")]
    ZoomIndexOutOfRange { index: usize, count: usize },

    #[error("{0} not a valid resolution.")]
    InvalidResolution(String),

    #[error("{0} not a valid text column.")]
    InvalidTextColumn(String),

    #[error("No traces to plot.")]
    NoTraces,
}
