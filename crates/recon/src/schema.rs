//! The fixed columns the engine understands.
//!
//! One table drives header detection, column lookup and key derivation so
//! the three never disagree about what "the chart column" is.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Patient,
    Chart,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Normalized cell equals the needle.
    Exact,
    /// Normalized cell contains the needle.
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Must match in both header detection passes.
    Required,
    /// Must match in the strict pass only.
    Preferred,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: Field,
    /// Canonical header title as printed by the scheduling system.
    pub title: &'static str,
    /// Lowercase text looked for during header detection.
    pub needle: &'static str,
    pub rule: MatchRule,
    pub detection: Detection,
}

pub static SCHEMA: [ColumnSpec; 3] = [
    ColumnSpec {
        field: Field::Patient,
        title: "Patient",
        needle: "patient",
        rule: MatchRule::Exact,
        detection: Detection::Required,
    },
    ColumnSpec {
        field: Field::Chart,
        title: "Chart #",
        needle: "chart",
        rule: MatchRule::Contains,
        detection: Detection::Required,
    },
    ColumnSpec {
        field: Field::Time,
        title: "Time",
        needle: "time",
        rule: MatchRule::Contains,
        detection: Detection::Preferred,
    },
];

/// Preferred output columns, in display order.
pub const DISPLAY_COLUMNS: [&str; 8] = [
    "Time",
    "Patient",
    "Chart #",
    "Provider Profile",
    "Appt Type",
    "Carrier",
    "CoPay",
    "Pat Bal",
];

impl ColumnSpec {
    pub fn get(field: Field) -> &'static ColumnSpec {
        match field {
            Field::Patient => &SCHEMA[0],
            Field::Chart => &SCHEMA[1],
            Field::Time => &SCHEMA[2],
        }
    }

    /// Does an already-normalized (trimmed, lowercased) cell satisfy the detection rule?
    pub fn detects(&self, normalized: &str) -> bool {
        match self.rule {
            MatchRule::Exact => normalized == self.needle,
            MatchRule::Contains => normalized.contains(self.needle),
        }
    }

    /// Does an already-normalized cell name this column exactly?
    pub fn is_titled(&self, normalized: &str) -> bool {
        normalized == self.title.to_lowercase()
    }
}

/// The schema field whose canonical title equals `header`, ignoring case and padding.
pub fn field_for_title(header: &str) -> Option<Field> {
    let normalized = header.trim().to_lowercase();
    SCHEMA
        .iter()
        .find(|spec| spec.is_titled(&normalized))
        .map(|spec| spec.field)
}
