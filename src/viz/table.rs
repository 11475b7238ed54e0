use crate::trace::CovidTrace;

use super::TextColumn;

/// Rows shown before the table is cut off
pub const MAX_TABLE_ROWS: usize = 15;

/// Ranked table beside the zoomed map
#[derive(Clone, Debug, PartialEq)]
pub struct RankedTable {
    pub headers: [String; 3],
    pub rows: Vec<[String; 3]>,
}

impl RankedTable {
    /// County, state and `text` for a trace sorted by density.
    /// Long tables keep the first rows followed by an ellipsis row.
    pub fn build(trace: &CovidTrace, text: TextColumn, ascending: bool) -> Self {
        let ranked = trace.ranked(ascending);
        let truncated = ranked.len() > MAX_TABLE_ROWS;

        let mut rows: Vec<[String; 3]> = ranked
            .into_iter()
            .take(MAX_TABLE_ROWS)
            .map(|row| [row.key.county.clone(), row.key.state.clone(), text.format(row)])
            .collect();

        if truncated {
            rows.push(["...".to_string(), "...".to_string(), "...".to_string()]);
        }

        Self {
            headers: ["County".to_string(), "State".to_string(), text.header()],
            rows,
        }
    }
}
