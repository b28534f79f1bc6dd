//! `apptdiff headers`: show how a file's header row was detected.

use std::path::PathBuf;

use apptdiff_recon::config::PREFERRED_SHEET;
use serde::Serialize;

use crate::recon::recon_err;
use crate::util::col_to_letter;
use crate::CliError;

#[derive(Debug, Serialize)]
struct HeaderReport {
    file: String,
    sheet: Option<String>,
    /// 1-based sheet row of the header.
    header_row: usize,
    headers: Vec<HeaderColumn>,
    resolved: Vec<HeaderColumn>,
    data_rows: usize,
}

#[derive(Debug, Serialize)]
struct HeaderColumn {
    column: String,
    name: String,
}

pub fn cmd_headers(file: PathBuf, sheet: Option<String>, json: bool) -> Result<(), CliError> {
    let sheet = sheet.unwrap_or_else(|| PREFERRED_SHEET.to_string());
    let loaded = apptdiff_io::load_grid(&file, &sheet).map_err(recon_err)?;
    let (first_row, first_col) = (loaded.first_row, loaded.first_col);
    let report = loaded.into_report().map_err(recon_err)?;

    let headers = report
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty())
        .map(|(i, h)| HeaderColumn { column: col_to_letter(first_col + i), name: h.clone() })
        .collect();
    let resolved = report
        .resolved_columns()
        .into_iter()
        .map(|(title, i, header)| HeaderColumn {
            column: col_to_letter(first_col + i),
            name: format!("{title} = {header}"),
        })
        .collect();

    let out = HeaderReport {
        file: report.source.clone(),
        sheet: report.sheet.clone(),
        header_row: first_row + report.header_row + 1,
        headers,
        resolved,
        data_rows: report.rows.len(),
    };

    if json {
        let json_str = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    println!("file:       {}", out.file);
    if let Some(sheet) = &out.sheet {
        println!("sheet:      {sheet}");
    }
    println!("header row: {}", out.header_row);
    println!("data rows:  {}", out.data_rows);
    println!("headers:");
    for h in &out.headers {
        println!("  {:>3}  {}", h.column, h.name);
    }
    println!("resolved:");
    for h in &out.resolved {
        println!("  {:>3}  {}", h.column, h.name);
    }
    Ok(())
}
