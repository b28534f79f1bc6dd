use unicode_width::UnicodeWidthStr;

use apptdiff_recon::ProjectedRow;

/// Widest a table column may get before values are cut.
pub(crate) const MAX_COLUMN_WIDTH: usize = 28;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    // leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Convert column index to letter (0 -> A, 1 -> B, 26 -> AA, etc.)
pub(crate) fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Fixed-width text table of projected rows, one line per row.
pub(crate) fn render_table(columns: &[String], rows: &[ProjectedRow]) -> String {
    if columns.is_empty() {
        return "No results\n".to_string();
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            rows.iter()
                .map(|r| display_width(r.get(c).unwrap_or("")))
                .chain(std::iter::once(display_width(c)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad_right(cell, *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(columns.iter().map(String::as_str).collect());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));

    if rows.is_empty() {
        out.push_str("No rows found.\n");
        return out;
    }
    for row in rows {
        out.push_str(&line(columns.iter().map(|c| row.get(c).unwrap_or("")).collect()));
    }
    out
}
