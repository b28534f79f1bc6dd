use std::collections::HashSet;
use std::fmt;

use crate::model::CellValue;
use crate::normalize::{normalize_chart, normalize_name};
use crate::report::Report;
use crate::schema::Field;

/// Identity used for set membership. Chart number first, name as fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    Chart(String),
    Name(String),
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chart(chart) => write!(f, "C:{chart}"),
            Self::Name(name) => write!(f, "N:{name}"),
        }
    }
}

/// Key from a row's chart and patient cells.
///
/// With `strict_chart_only` a chart-less row has no key and takes no part
/// in any comparison.
pub fn identity_key(chart: &CellValue, patient: &CellValue, strict_chart_only: bool) -> Option<IdentityKey> {
    if let Some(chart) = normalize_chart(chart) {
        return Some(IdentityKey::Chart(chart));
    }
    if strict_chart_only {
        return None;
    }
    normalize_name(patient).map(IdentityKey::Name)
}

pub fn derive_key(report: &Report, row: &[CellValue], strict_chart_only: bool) -> Option<IdentityKey> {
    identity_key(
        report.cell(row, Field::Chart),
        report.cell(row, Field::Patient),
        strict_chart_only,
    )
}

/// Every derivable key of a report.
pub fn key_set(report: &Report, strict_chart_only: bool) -> HashSet<IdentityKey> {
    report
        .rows
        .iter()
        .filter_map(|row| derive_key(report, row, strict_chart_only))
        .collect()
}

/// Distinct identities in a report (the "unique patients" total).
pub fn unique_count(report: &Report, strict_chart_only: bool) -> usize {
    key_set(report, strict_chart_only).len()
}

/// Value-duplicate tag: always name and chart, regardless of strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(chart: &CellValue, patient: &CellValue) -> Self {
        let name = normalize_name(patient).unwrap_or_default();
        let chart = normalize_chart(chart).unwrap_or_default();
        Self(format!("{name}__{chart}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn dedup_key(report: &Report, row: &[CellValue]) -> DedupKey {
    DedupKey::new(report.cell(row, Field::Chart), report.cell(row, Field::Patient))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn chart_wins_over_name() {
        let key = identity_key(&text("1002"), &text("*Doe, Jane"), false).unwrap();
        assert_eq!(key.to_string(), "C:1002");
    }

    #[test]
    fn name_fallback_when_chart_blank() {
        let key = identity_key(&CellValue::Empty, &text(" lee,  ann"), false).unwrap();
        assert_eq!(key, IdentityKey::Name("LEE, ANN".into()));
        assert_eq!(key.to_string(), "N:LEE, ANN");
    }

    #[test]
    fn strict_mode_has_no_name_fallback() {
        assert_eq!(identity_key(&text(" "), &text("Lee, Ann"), true), None);
        assert_eq!(
            identity_key(&text("55"), &text("Lee, Ann"), true),
            Some(IdentityKey::Chart("55".into()))
        );
    }

    #[test]
    fn nothing_usable_means_no_key() {
        assert_eq!(identity_key(&CellValue::Empty, &text("*"), false), None);
    }

    #[test]
    fn float_and_integer_charts_share_a_key() {
        let a = identity_key(&CellValue::Number(163794.0), &CellValue::Empty, true);
        let b = identity_key(&text("163794.0"), &CellValue::Empty, true);
        let c = identity_key(&text("163794"), &CellValue::Empty, true);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn dedup_key_includes_name_and_chart() {
        assert_eq!(DedupKey::new(&text("55.0"), &text("*Doe, Jane")).as_str(), "DOE, JANE__55");
        assert_eq!(DedupKey::new(&CellValue::Empty, &CellValue::Empty).as_str(), "__");
        assert_ne!(
            DedupKey::new(&text("55"), &text("Doe, Jane")),
            DedupKey::new(&text("55.0"), &text("Roe, Rick"))
        );
    }
}
