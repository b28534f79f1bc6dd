use crate::key::unique_count;
use crate::model::{InputTotals, ReconSummary};
use crate::report::Report;

/// Totals for the presentation layer: per-input row and identity counts
/// plus result sizes.
pub fn compute_summary(
    reports: &[&Report],
    strict_chart_only: bool,
    late_adds: usize,
    reverse: Option<usize>,
) -> ReconSummary {
    let inputs = reports
        .iter()
        .map(|report| InputTotals {
            label: report.source.clone(),
            rows: report.rows.len(),
            unique: unique_count(report, strict_chart_only),
        })
        .collect();

    ReconSummary {
        inputs,
        late_adds,
        reverse,
    }
}
