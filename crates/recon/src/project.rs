use crate::model::{cell_at, ProjectedRow, Row};
use crate::report::Report;

/// Output columns for a report.
///
/// Preferred columns present in the report are used in the preferred order.
/// With none present, every non-blank header is used in sheet order.
pub fn choose_columns<S: AsRef<str>>(headers: &[String], preferred: &[S]) -> Vec<String> {
    let available = |name: &str| !name.trim().is_empty() && headers.iter().any(|h| h == name);
    let picked: Vec<String> = preferred
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| available(name))
        .map(str::to_string)
        .collect();
    if !picked.is_empty() {
        return picked;
    }
    headers
        .iter()
        .filter(|h| !h.trim().is_empty())
        .cloned()
        .collect()
}

/// Map rows onto `columns`, reading cells through `report`'s own column lookup.
///
/// Every column appears in every projected row; missing cells become `""`.
pub fn project_rows(report: &Report, rows: &[&Row], columns: &[String]) -> Vec<ProjectedRow> {
    let positions: Vec<Option<usize>> = columns.iter().map(|c| report.position(c)).collect();
    rows.iter()
        .map(|row| {
            let fields = columns
                .iter()
                .zip(&positions)
                .map(|(column, pos)| (column.clone(), cell_at(row, *pos).as_text()))
                .collect();
            ProjectedRow::new(fields)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Grid};
    use crate::schema::DISPLAY_COLUMNS;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn preferred_order_wins_over_sheet_order() {
        let cols = choose_columns(&headers(&["Patient", "Carrier", "Time", "Chart #"]), &DISPLAY_COLUMNS);
        assert_eq!(cols, vec!["Time", "Patient", "Chart #", "Carrier"]);
    }

    #[test]
    fn preferred_match_is_case_sensitive() {
        let cols = choose_columns(&headers(&["PATIENT", "", "Notes"]), &DISPLAY_COLUMNS);
        assert_eq!(cols, vec!["PATIENT", "Notes"]);
    }

    #[test]
    fn fallback_keeps_sheet_order_and_drops_blanks() {
        let cols = choose_columns(&headers(&["B", "", "A", "  "]), &["Pat Bal"]);
        assert_eq!(cols, vec!["B", "A"]);
    }

    #[test]
    fn projection_fills_every_column() {
        let grid: Grid = vec![
            vec!["Time".into(), "Patient".into(), "Chart #".into(), "".into(), "Carrier".into()],
            vec!["9:00".into(), "Doe, Jane".into(), CellValue::Number(1002.0)],
        ];
        let report = Report::from_grid("t", None, &grid).unwrap();
        let columns = choose_columns(&report.headers, &DISPLAY_COLUMNS);
        let rows: Vec<&Row> = report.rows.iter().collect();
        let projected = project_rows(&report, &rows, &columns);

        assert_eq!(projected.len(), 1);
        let row = &projected[0];
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["Time", "Patient", "Chart #", "Carrier"]);
        assert_eq!(row.get("Chart #"), Some("1002"));
        assert_eq!(row.get("Carrier"), Some(""));
    }

    #[test]
    fn projection_through_another_reports_layout() {
        let target: Grid = vec![vec!["Time".into(), "Patient".into(), "Chart #".into()]];
        let baseline: Grid = vec![
            vec!["Chart #".into(), "Patient".into(), "Appt Time".into()],
            vec!["7".into(), "Roe, Rick".into(), "8:00".into()],
        ];
        let target = Report::from_grid("target", None, &target).unwrap();
        let baseline = Report::from_grid("baseline", None, &baseline).unwrap();
        let columns = choose_columns(&target.headers, &DISPLAY_COLUMNS);
        let rows: Vec<&Row> = baseline.rows.iter().collect();
        let projected = project_rows(&baseline, &rows, &columns);

        assert_eq!(projected[0].get("Patient"), Some("Roe, Rick"));
        assert_eq!(projected[0].get("Chart #"), Some("7"));
        assert_eq!(projected[0].get("Time"), Some("8:00"));
    }
}
