// CSV/TSV import and late-add export

use std::io::{Read, Write};
use std::path::Path;

use apptdiff_recon::model::{CellValue, Grid, ProjectedRow};
use apptdiff_recon::ReconError;
use chrono::NaiveDate;

use crate::LoadedGrid;

/// Read a delimited schedule export into a grid. Empty fields become
/// [`CellValue::Empty`]; everything else stays text.
pub fn load_grid(path: &Path) -> Result<LoadedGrid, ReconError> {
    let file = crate::file_label(path);
    let content = read_file_as_utf8(path).map_err(|e| ReconError::Io(format!("{file}: {e}")))?;
    let delimiter = sniff_delimiter(&content);
    let grid = grid_from_string(&content, delimiter).map_err(|message| ReconError::Workbook {
        file: file.clone(),
        message,
    })?;
    log::debug!("{file}: {} csv rows, delimiter {:?}", grid.len(), delimiter as char);

    Ok(LoadedGrid {
        file_name: file,
        sheet: None,
        first_row: 0,
        first_col: 0,
        grid,
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Exports open with a one-cell title line, so score on the widest line
        let Some(&target) = counts.iter().max() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    // Excel writes a BOM ahead of the first header cell
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn grid_from_string(content: &str, delimiter: u8) -> Result<Grid, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Grid::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::from(field)
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Which result list an exported file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    LateAdds,
    Reverse,
}

impl ExportKind {
    fn stem(self) -> &'static str {
        match self {
            Self::LateAdds => "late_adds",
            Self::Reverse => "revised_not_in_reprint",
        }
    }
}

/// `late_adds_2026-10-19.csv`, `revised_not_in_reprint_2026-10-19.csv`.
pub fn export_file_name(kind: ExportKind, date: NaiveDate) -> String {
    format!("{}_{}.csv", kind.stem(), date.format("%Y-%m-%d"))
}

/// Write projected rows as CSV: one header line of column names, then one
/// line per row. Fields are quoted only when they need it, lines end in `\n`.
pub fn write_projected_csv<W: Write>(writer: W, columns: &[String], rows: &[ProjectedRow]) -> Result<(), ReconError> {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::Any(b'\n'));
    let mut writer = builder.from_writer(writer);

    writer.write_record(columns).map_err(|e| ReconError::Io(e.to_string()))?;
    for row in rows {
        let record: Vec<&str> = columns.iter().map(|c| row.get(c).unwrap_or("")).collect();
        if let [""] = record.as_slice() {
            // The writer quotes a lone empty field (`""`); an empty line is wanted.
            let mut inner = writer.into_inner().map_err(|e| ReconError::Io(e.to_string()))?;
            inner.write_all(b"\n").map_err(|e| ReconError::Io(e.to_string()))?;
            writer = builder.from_writer(inner);
            continue;
        }
        writer.write_record(&record).map_err(|e| ReconError::Io(e.to_string()))?;
    }
    writer.flush().map_err(|e| ReconError::Io(e.to_string()))?;
    Ok(())
}

/// Render projected rows to a CSV string.
pub fn projected_to_string(columns: &[String], rows: &[ProjectedRow]) -> Result<String, ReconError> {
    let mut buf = Vec::new();
    write_projected_csv(&mut buf, columns, rows)?;
    String::from_utf8(buf).map_err(|e| ReconError::Io(e.to_string()))
}

/// Export rows into `dir` under the dated name for `kind`. Returns `None`
/// and writes nothing when there are no rows.
pub fn export_projected(
    dir: &Path,
    kind: ExportKind,
    date: NaiveDate,
    columns: &[String],
    rows: &[ProjectedRow],
) -> Result<Option<std::path::PathBuf>, ReconError> {
    if rows.is_empty() {
        return Ok(None);
    }
    std::fs::create_dir_all(dir).map_err(|e| ReconError::Io(format!("{}: {e}", dir.display())))?;
    let path = dir.join(export_file_name(kind, date));
    let file = std::fs::File::create(&path).map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))?;
    write_projected_csv(file, columns, rows)?;
    log::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(Some(path))
}
