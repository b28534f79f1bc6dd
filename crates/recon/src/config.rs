use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::schema::DISPLAY_COLUMNS;

/// Sheet name used by the scheduling system's appointment export.
pub const PREFERRED_SHEET: &str = "MasterAppointmentsWithInsurance";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    /// Sheet to read when a workbook has it; otherwise the first sheet.
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Output columns, in display order, used when the target report has them.
    #[serde(default = "default_display_columns")]
    pub display_columns: Vec<String>,
    /// Match on chart number only; rows without one are left out.
    #[serde(default)]
    pub strict_chart_only: bool,
    /// Also list baseline rows missing from the target (two-way runs only).
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for CSV exports.
    #[serde(default)]
    pub csv_dir: Option<String>,
    /// File for the JSON result.
    #[serde(default)]
    pub json: Option<String>,
}

fn default_sheet() -> String {
    PREFERRED_SHEET.to_string()
}

fn default_display_columns() -> Vec<String> {
    DISPLAY_COLUMNS.iter().map(|c| c.to_string()).collect()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            display_columns: default_display_columns(),
            strict_chart_only: false,
            reverse: false,
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.sheet.trim().is_empty() {
            return Err(ReconError::ConfigValidation("sheet name must not be blank".into()));
        }

        if self.display_columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "display_columns must list at least one column".into(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.display_columns {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "display_columns must not contain blank names".into(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "display column '{column}' is listed twice"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
