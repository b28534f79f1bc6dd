// Excel / ODS schedule import via calamine

use std::io::Cursor;
use std::path::Path;

use apptdiff_recon::model::{CellValue, Grid};
use apptdiff_recon::ReconError;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::LoadedGrid;

/// Read the preferred sheet (or the first one) of a workbook on disk.
pub fn load_grid(path: &Path, preferred_sheet: &str) -> Result<LoadedGrid, ReconError> {
    let file = crate::file_label(path);
    let mut workbook = open_workbook_auto(path).map_err(|e| ReconError::Workbook {
        file: file.clone(),
        message: e.to_string(),
    })?;
    read_sheet(&mut workbook, file, preferred_sheet)
}

/// Same as [`load_grid`] for workbook bytes already in memory.
pub fn load_grid_from_bytes(
    bytes: &[u8],
    file_name: &str,
    preferred_sheet: &str,
) -> Result<LoadedGrid, ReconError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        ReconError::Workbook {
            file: file_name.to_string(),
            message: e.to_string(),
        }
    })?;
    read_sheet(&mut workbook, file_name.to_string(), preferred_sheet)
}

/// Preferred sheet when present, else the first sheet.
pub fn select_sheet<'a>(names: &'a [String], preferred: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|n| n.as_str() == preferred)
        .or_else(|| names.first())
        .map(String::as_str)
}

fn read_sheet<RS>(workbook: &mut Sheets<RS>, file: String, preferred_sheet: &str) -> Result<LoadedGrid, ReconError>
where
    RS: std::io::Read + std::io::Seek,
{
    let names = workbook.sheet_names().to_vec();
    let sheet = select_sheet(&names, preferred_sheet)
        .ok_or_else(|| ReconError::NoSheet { file: file.clone() })?
        .to_string();
    if sheet != preferred_sheet {
        log::warn!("{file}: sheet '{preferred_sheet}' not found, reading '{sheet}'");
    }

    let range = workbook.worksheet_range(&sheet).map_err(|e| ReconError::Workbook {
        file: file.clone(),
        message: format!("cannot read sheet '{sheet}': {e}"),
    })?;

    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let grid = range_to_grid(&range);
    log::debug!("{file}: sheet '{sheet}' has {} rows", grid.len());

    Ok(LoadedGrid {
        file_name: file,
        sheet: Some(sheet),
        first_row,
        first_col,
        grid,
    })
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect()
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        // Store as TRUE/FALSE text, as the sheet shows it
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        // Dates and times keep their serial value
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
