//! Cell normalization shared by header detection, key derivation and dedup.

use crate::model::CellValue;

/// Trim + lowercase, for header comparisons.
pub fn normalize_header(cell: &CellValue) -> String {
    cell.as_text().trim().to_lowercase()
}

/// Canonical chart number, or `None` when the cell holds nothing usable.
///
/// Numeric values collapse to their truncated integer form so `163794.0`
/// and `163794` compare equal. Non-numeric values lose a trailing `.0`.
pub fn normalize_chart(cell: &CellValue) -> Option<String> {
    if let CellValue::Number(n) = cell {
        if n.is_finite() {
            return Some(truncated_integer(*n));
        }
    }
    let cleaned: String = cell.as_text().chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(truncated_integer(n)),
        _ => Some(cleaned.strip_suffix(".0").unwrap_or(&cleaned).to_string()),
    }
}

fn truncated_integer(n: f64) -> String {
    let t = n.trunc();
    if t == 0.0 {
        // Also catches -0.0.
        return "0".to_string();
    }
    if t.abs() < 9.0e18 {
        format!("{}", t as i64)
    } else {
        format!("{}", t)
    }
}

/// Uppercased patient name with `*` markers stripped and whitespace collapsed.
pub fn normalize_name(cell: &CellValue) -> Option<String> {
    let text = cell.as_text();
    let stripped = text.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.to_uppercase())
}

/// Name normalization applied to an already-normalized string.
pub fn normalize_name_str(name: &str) -> Option<String> {
    normalize_name(&CellValue::Text(name.to_string()))
}
