// Schedule file loading and result export

pub mod csv;
pub mod xlsx;

use std::path::Path;

use apptdiff_recon::model::Grid;
use apptdiff_recon::{ReconError, Report};

/// Raw cells read from one sheet of an input file.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    /// Display name of the file (no directory).
    pub file_name: String,
    /// Sheet the grid came from; `None` for delimited text.
    pub sheet: Option<String>,
    /// Zero-based sheet row of `grid[0]`.
    pub first_row: usize,
    /// Zero-based sheet column of `grid[_][0]`.
    pub first_col: usize,
    pub grid: Grid,
}

/// Load the raw grid of a schedule export. `.csv`, `.tsv` and `.txt` go
/// through the delimited reader, everything else through the workbook reader.
pub fn load_grid(path: &Path, preferred_sheet: &str) -> Result<LoadedGrid, ReconError> {
    if is_delimited(path) {
        csv::load_grid(path)
    } else {
        xlsx::load_grid(path, preferred_sheet)
    }
}

/// Load a schedule export and locate its header row.
pub fn load_report(path: &Path, preferred_sheet: &str) -> Result<Report, ReconError> {
    let loaded = load_grid(path, preferred_sheet)?;
    loaded.into_report()
}

impl LoadedGrid {
    pub fn into_report(self) -> Result<Report, ReconError> {
        Report::from_grid(&self.file_name, self.sheet.as_deref(), &self.grid)
    }
}

fn is_delimited(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    matches!(ext.as_deref(), Some("csv" | "tsv" | "txt"))
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
