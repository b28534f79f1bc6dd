use std::collections::HashSet;

use crate::key::dedup_key;
use crate::model::Row;
use crate::report::Report;

/// Keep the first row for each (name, chart) pair, in original order.
///
/// Rows with neither name nor chart share the key `__` and collapse to one.
pub fn dedupe_rows<'a>(report: &Report, rows: &[&'a Row]) -> Vec<&'a Row> {
    let mut seen = HashSet::new();
    let out: Vec<&Row> = rows
        .iter()
        .copied()
        .filter(|row| seen.insert(dedup_key(report, row)))
        .collect();
    if out.len() < rows.len() {
        log::debug!("{}: {} duplicate rows collapsed", report.source, rows.len() - out.len());
    }
    out
}
