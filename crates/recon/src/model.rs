use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single scalar read from a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Empty or an empty string. Whitespace-only text is *not* blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Render the cell the way the sheet displays it.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Integers without decimals, everything else in shortest form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One sheet row, positionally aligned to the sheet's columns.
pub type Row = Vec<CellValue>;

/// A full sheet as read by the loader. Rows may be ragged.
pub type Grid = Vec<Row>;

/// Positional read that treats cells past the end of a ragged row as empty.
pub fn cell_at(row: &[CellValue], col: Option<usize>) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    col.and_then(|c| row.get(c)).unwrap_or(&EMPTY)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A result row mapped onto the chosen output columns, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    fields: Vec<(String, String)>,
}

impl ProjectedRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ProjectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconMode {
    /// Target vs one baseline, reverse direction optional.
    TwoWay,
    /// Target vs the union of two baselines.
    Union,
}

impl std::fmt::Display for ReconMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoWay => write!(f, "two_way"),
            Self::Union => write!(f, "union"),
        }
    }
}

/// Per-input counts shown in the totals block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputTotals {
    pub label: String,
    pub rows: usize,
    pub unique: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub inputs: Vec<InputTotals>,
    pub late_adds: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub mode: ReconMode,
    pub strict_chart_only: bool,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub columns: Vec<String>,
    pub late_adds: Vec<ProjectedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<Vec<ProjectedRow>>,
}
