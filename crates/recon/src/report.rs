//! One uploaded schedule export, reduced to headers plus usable data rows.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ReconError;
use crate::header::locate_header;
use crate::model::{cell_at, CellValue, Grid, Row};
use crate::schema::{field_for_title, ColumnSpec, Field, SCHEMA};

/// Resolved positions of the schema columns. First occurrence wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnIndex {
    pub patient: Option<usize>,
    pub chart: Option<usize>,
    pub time: Option<usize>,
}

impl ColumnIndex {
    /// Resolve each schema field against a header list.
    ///
    /// An exact title match (`chart #`) is preferred; failing that the first
    /// header satisfying the field's detection rule (`chart no`) is used.
    pub fn resolve(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |field: Field| {
            let spec = ColumnSpec::get(field);
            normalized
                .iter()
                .position(|h| spec.is_titled(h))
                .or_else(|| normalized.iter().position(|h| !h.is_empty() && spec.detects(h)))
        };
        Self {
            patient: find(Field::Patient),
            chart: find(Field::Chart),
            time: find(Field::Time),
        }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Patient => self.patient,
            Field::Chart => self.chart,
            Field::Time => self.time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    /// Label used in messages and totals (usually the file name).
    pub source: String,
    /// Sheet the grid came from, when the loader knows it.
    pub sheet: Option<String>,
    /// Zero-based index of the header row within the loaded grid.
    pub header_row: usize,
    /// Trimmed header titles, blanks kept so positions line up with the sheet.
    pub headers: Vec<String>,
    pub columns: ColumnIndex,
    /// Data rows below the header: not blank, with a Patient value.
    pub rows: Vec<Row>,
    positions: HashMap<String, usize>,
}

impl Report {
    /// Locate the header row and build the report, or fail naming the source.
    pub fn from_grid(source: &str, sheet: Option<&str>, grid: &Grid) -> Result<Self, ReconError> {
        let header_row = locate_header(grid).ok_or_else(|| ReconError::HeaderNotFound {
            file: source.to_string(),
        })?;
        Ok(Self::build(source, sheet, grid, header_row))
    }

    /// Build the report from a grid whose header row is already known.
    pub fn build(source: &str, sheet: Option<&str>, grid: &Grid, header_row: usize) -> Self {
        let headers: Vec<String> = grid
            .get(header_row)
            .map(|row| row.iter().map(|c| c.as_text().trim().to_string()).collect())
            .unwrap_or_default();
        let columns = ColumnIndex::resolve(&headers);

        let mut positions = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            if !h.is_empty() {
                positions.entry(h.clone()).or_insert(i);
            }
        }

        let mut skipped_blank = 0usize;
        let mut skipped_no_patient = 0usize;
        let mut rows = Vec::new();
        for row in grid.iter().skip(header_row + 1) {
            if row.iter().all(CellValue::is_blank) {
                skipped_blank += 1;
                continue;
            }
            let patient = cell_at(row, columns.patient);
            if patient.as_text().trim().is_empty() {
                skipped_no_patient += 1;
                continue;
            }
            rows.push(row.clone());
        }

        log::debug!(
            "{source}: header at row {}, {} data rows ({} blank, {} without patient skipped)",
            header_row + 1,
            rows.len(),
            skipped_blank,
            skipped_no_patient,
        );

        Self {
            source: source.to_string(),
            sheet: sheet.map(str::to_string),
            header_row,
            headers,
            columns,
            rows,
            positions,
        }
    }

    /// Column read for `name`.
    ///
    /// Schema titles always go through the schema index, so projection reads
    /// the same cell that key derivation read (`Chart #` finds a `CHART #` or
    /// `Chart No` column too). Other names use the first header titled
    /// exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        match field_for_title(name) {
            Some(field) => self.columns.get(field),
            None => self.positions.get(name).copied(),
        }
    }

    /// Schema field of a data row.
    pub fn cell<'a>(&self, row: &'a [CellValue], field: Field) -> &'a CellValue {
        cell_at(row, self.columns.get(field))
    }

    /// Schema columns that resolved, with the header text they resolved to.
    pub fn resolved_columns(&self) -> Vec<(&'static str, usize, &str)> {
        SCHEMA
            .iter()
            .filter_map(|spec| {
                self.columns
                    .get(spec.field)
                    .map(|i| (spec.title, i, self.headers[i].as_str()))
            })
            .collect()
    }

    pub fn non_blank_headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str).filter(|h| !h.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells
            .iter()
            .map(|c| if c.is_empty() { CellValue::Empty } else { CellValue::from(*c) })
            .collect()
    }

    fn sample_grid() -> Grid {
        vec![
            row(&["Master Appointments"]),
            row(&["Time", "", "Patient", "Chart #", "Carrier"]),
            row(&["9:00", "", "Doe, Jane", "1002", "Aetna"]),
            row(&["", "", "", "", ""]),
            row(&["9:15", "x", "", "1003", "Cigna"]),
            row(&["9:30", "", "Lee, Ann", "", "Cigna"]),
            row(&["9:45", "", "   ", "1004", ""]),
        ]
    }

    #[test]
    fn keeps_positional_blank_headers() {
        let report = Report::from_grid("reprint.xlsx", None, &sample_grid()).unwrap();
        assert_eq!(report.header_row, 1);
        assert_eq!(report.headers, vec!["Time", "", "Patient", "Chart #", "Carrier"]);
        assert_eq!(report.columns.patient, Some(2));
        assert_eq!(report.columns.chart, Some(3));
        assert_eq!(report.columns.time, Some(0));
    }

    #[test]
    fn drops_blank_rows_and_rows_without_patient() {
        let report = Report::from_grid("reprint.xlsx", None, &sample_grid()).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.cell(&report.rows[0], Field::Patient), &CellValue::from("Doe, Jane"));
        // chart-less row is kept; keys decide what to do with it
        assert_eq!(report.cell(&report.rows[1], Field::Chart), &CellValue::Empty);
    }

    #[test]
    fn missing_header_names_the_file() {
        let grid = vec![row(&["nothing", "here"])];
        let err = Report::from_grid("revised.xlsx", None, &grid).unwrap_err();
        assert_eq!(err.to_string(), "Could not detect header row in revised.xlsx");
    }

    #[test]
    fn duplicate_headers_resolve_to_first_occurrence() {
        let grid = vec![
            row(&["Time", "Patient", "Chart #", "Patient", "Carrier", "Carrier"]),
            row(&["9:00", "Doe, Jane", "1", "Other", "A", "B"]),
        ];
        let report = Report::from_grid("r", None, &grid).unwrap();
        assert_eq!(report.columns.patient, Some(1));
        assert_eq!(report.position("Carrier"), Some(4));
    }

    #[test]
    fn case_variant_duplicates_read_the_keyed_column() {
        let grid = vec![
            row(&["Time", "patient", "Patient", "chart #", "Chart #"]),
            row(&["9:00", "Doe, Jane", "Roe, Rick", "111", "222"]),
        ];
        let report = Report::from_grid("r", None, &grid).unwrap();
        assert_eq!(report.columns.patient, Some(1));
        assert_eq!(report.columns.chart, Some(3));
        assert_eq!(report.position("Patient"), Some(1));
        assert_eq!(report.position("Chart #"), Some(3));

        let row = &report.rows[0];
        assert_eq!(
            crate::key::derive_key(&report, row, false).map(|k| k.to_string()).as_deref(),
            Some("C:111")
        );
        let projected = crate::project::project_rows(&report, &[row], &["Patient".to_string(), "Chart #".to_string()]);
        assert_eq!(projected[0].get("Chart #"), Some("111"));
        assert_eq!(projected[0].get("Patient"), Some("Doe, Jane"));
    }

    #[test]
    fn chart_variant_header_resolves_by_rule() {
        let grid = vec![
            row(&["Appt Time", "Patient", "Chart No"]),
            row(&["9:00", "Doe, Jane", "1"]),
        ];
        let report = Report::from_grid("r", None, &grid).unwrap();
        assert_eq!(report.columns.chart, Some(2));
        assert_eq!(report.columns.time, Some(0));
        assert_eq!(report.position("Chart #"), Some(2));
        assert_eq!(report.position("Chart No"), Some(2));
    }

    #[test]
    fn numeric_patient_counts_as_present() {
        let grid = vec![
            row(&["Time", "Patient", "Chart #"]),
            vec![CellValue::Empty, CellValue::Number(42.0), CellValue::Empty],
        ];
        let report = Report::from_grid("r", None, &grid).unwrap();
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn resolved_columns_lists_schema_matches() {
        let report = Report::from_grid("r", Some("Sheet1"), &sample_grid()).unwrap();
        let resolved = report.resolved_columns();
        assert_eq!(resolved[0], ("Patient", 2, "Patient"));
        assert_eq!(resolved[1], ("Chart #", 3, "Chart #"));
        assert_eq!(report.sheet.as_deref(), Some("Sheet1"));
    }
}
