//! Header row detection in semi-structured report exports.
//!
//! Exports carry a title block above the real column titles, so the header
//! row is found by content rather than assumed to be row one.

use crate::model::Row;
use crate::normalize::normalize_header;
use crate::schema::{Detection, SCHEMA};

/// Rows examined before giving up.
pub const HEADER_SCAN_LIMIT: usize = 120;

/// Index of the header row, or `None` when neither pass finds one.
///
/// Pass 1 wants every required and preferred schema column (Patient, a
/// Chart variant and a Time variant). Pass 2 drops the preferred ones.
pub fn locate_header(grid: &[Row]) -> Option<usize> {
    let look = grid.len().min(HEADER_SCAN_LIMIT);
    let normalized: Vec<Vec<String>> = grid[..look]
        .iter()
        .map(|row| row.iter().map(normalize_header).collect())
        .collect();

    let strict = normalized.iter().position(|row| row_matches(row, false));
    if strict.is_some() {
        return strict;
    }
    let relaxed = normalized.iter().position(|row| row_matches(row, true));
    if let Some(idx) = relaxed {
        log::debug!("header row {idx} found without a time column");
    }
    relaxed
}

fn row_matches(cells: &[String], relaxed: bool) -> bool {
    SCHEMA
        .iter()
        .filter(|spec| !relaxed || spec.detection == Detection::Required)
        .all(|spec| cells.iter().any(|cell| spec.detects(cell)))
}
