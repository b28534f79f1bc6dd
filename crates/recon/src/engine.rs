use std::collections::HashSet;

use crate::config::ReconConfig;
use crate::dedup::dedupe_rows;
use crate::error::ReconError;
use crate::key::{derive_key, key_set, IdentityKey};
use crate::model::{ProjectedRow, ReconMeta, ReconMode, ReconResult, Row};
use crate::project::{choose_columns, project_rows};
use crate::report::Report;
use crate::summary::compute_summary;

/// Loaded reports for one run.
pub enum ReconInput {
    /// Target compared against a single baseline.
    TwoWay { baseline: Report, target: Report },
    /// Target compared against the union of two baselines.
    Union {
        baseline: Report,
        extra_baseline: Report,
        target: Report,
    },
}

impl ReconInput {
    pub fn mode(&self) -> ReconMode {
        match self {
            Self::TwoWay { .. } => ReconMode::TwoWay,
            Self::Union { .. } => ReconMode::Union,
        }
    }

    pub fn target(&self) -> &Report {
        match self {
            Self::TwoWay { target, .. } | Self::Union { target, .. } => target,
        }
    }

    /// Baseline reports, in input order.
    pub fn baselines(&self) -> Vec<&Report> {
        match self {
            Self::TwoWay { baseline, .. } => vec![baseline],
            Self::Union {
                baseline,
                extra_baseline,
                ..
            } => vec![baseline, extra_baseline],
        }
    }

    /// Every report, baselines first, target last.
    pub fn reports(&self) -> Vec<&Report> {
        let mut all = self.baselines();
        all.push(self.target());
        all
    }
}

/// Run reconciliation per config. Returns projected late adds + summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;
    let mode = input.mode();
    if mode == ReconMode::Union && config.reverse {
        return Err(ReconError::ConfigValidation(
            "reverse comparison is only available for two-way runs".into(),
        ));
    }

    let strict = config.strict_chart_only;
    let target = input.target();
    let baselines = input.baselines();

    let baseline_keys = union_key_set(&baselines, strict);
    let late_raw = difference(target, &baseline_keys, strict);

    // Columns follow the target report: it is the current schedule.
    let columns = choose_columns(&target.headers, &config.display_columns);
    let late_adds = project_rows(target, &dedupe_rows(target, &late_raw), &columns);

    let reverse: Option<Vec<ProjectedRow>> = match input {
        ReconInput::TwoWay { baseline, target } if config.reverse => {
            let target_keys = key_set(target, strict);
            let reverse_raw = difference(baseline, &target_keys, strict);
            Some(project_rows(baseline, &dedupe_rows(baseline, &reverse_raw), &columns))
        }
        _ => None,
    };

    let summary = compute_summary(
        &input.reports(),
        strict,
        late_adds.len(),
        reverse.as_ref().map(Vec::len),
    );

    log::info!(
        "{mode} run: {} late adds{}",
        summary.late_adds,
        summary
            .reverse
            .map(|n| format!(", {n} baseline rows missing from target"))
            .unwrap_or_default(),
    );

    Ok(ReconResult {
        meta: ReconMeta {
            mode,
            strict_chart_only: strict,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        columns,
        late_adds,
        reverse,
    })
}

/// Keys of every baseline report, merged.
pub fn union_key_set(reports: &[&Report], strict_chart_only: bool) -> HashSet<IdentityKey> {
    reports
        .iter()
        .flat_map(|report| key_set(report, strict_chart_only))
        .collect()
}

/// Rows of `report` with a key that `other_keys` lacks, in original order.
///
/// Rows without a derivable key are never reported: they cannot be shown
/// to be missing.
pub fn difference<'a>(
    report: &'a Report,
    other_keys: &HashSet<IdentityKey>,
    strict_chart_only: bool,
) -> Vec<&'a Row> {
    report
        .rows
        .iter()
        .filter(|row| {
            derive_key(report, row, strict_chart_only)
                .map(|key| !other_keys.contains(&key))
                .unwrap_or(false)
        })
        .collect()
}
