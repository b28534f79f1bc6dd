//! `apptdiff compare` / `apptdiff union`: late adds between schedule exports.

use std::path::{Path, PathBuf};

use apptdiff_io::csv::{export_projected, ExportKind};
use apptdiff_recon::{ReconConfig, ReconError, ReconInput, ReconResult, Report};
use clap::Args;

use crate::exit_codes::{recon_exit_code, EXIT_LATE_ADDS, EXIT_USAGE};
use crate::util::render_table;
use crate::CliError;

/// Flags shared by `compare` and `union`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Match on chart number only; rows without a chart number are ignored
    #[arg(long)]
    pub strict: bool,

    /// Sheet to read (defaults to MasterAppointmentsWithInsurance, else the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// TOML config file; flags override its values
    #[arg(long, env = "APPTDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output JSON to stdout instead of the human summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Export non-empty results as dated CSV files into this directory
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Exit 1 when any late add is found
    #[arg(long)]
    pub fail_on_late_adds: bool,
}

/// Config after merging the file (if any) with command-line flags.
#[derive(Debug)]
struct Settings {
    config: ReconConfig,
    csv_dir: Option<PathBuf>,
    json_out: Option<PathBuf>,
}

pub(crate) fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::HeaderNotFound { .. } => Some(
            "expected a header row with a 'Patient' column and a 'Chart' column near the top of the sheet"
                .to_string(),
        ),
        ReconError::NoSheet { .. } => Some("is the file an appointment schedule export?".to_string()),
        _ => None,
    };
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
}

pub fn cmd_compare(baseline: PathBuf, target: PathBuf, reverse: bool, args: RunArgs) -> Result<(), CliError> {
    let settings = resolve_settings(&args, Some(reverse))?;
    let sheet = settings.config.sheet.clone();

    let input = ReconInput::TwoWay {
        baseline: load(&baseline, &sheet)?,
        target: load(&target, &sheet)?,
    };
    run_and_report(&settings, &args, &input)
}

pub fn cmd_union(
    baseline: PathBuf,
    extra_baseline: PathBuf,
    target: PathBuf,
    args: RunArgs,
) -> Result<(), CliError> {
    let settings = resolve_settings(&args, None)?;
    let sheet = settings.config.sheet.clone();

    let input = ReconInput::Union {
        baseline: load(&baseline, &sheet)?,
        extra_baseline: load(&extra_baseline, &sheet)?,
        target: load(&target, &sheet)?,
    };
    run_and_report(&settings, &args, &input)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: sheet '{}', {} display column(s), strict_chart_only = {}, reverse = {}",
        config.sheet,
        config.display_columns.len(),
        config.strict_chart_only,
        config.reverse,
    );
    Ok(())
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;
    ReconConfig::from_toml(&config_str).map_err(recon_err)
}

/// `reverse` is the `--reverse` flag for two-way runs and `None` for union
/// runs, which have no reverse list.
fn resolve_settings(args: &RunArgs, reverse: Option<bool>) -> Result<Settings, CliError> {
    let (mut config, base_dir) = match &args.config {
        Some(path) => {
            let config = read_config(path)?;
            // Output paths in the file are relative to the file
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (config, Some(base))
        }
        None => (ReconConfig::default(), None),
    };

    if args.strict {
        config.strict_chart_only = true;
    }
    match reverse {
        Some(true) => config.reverse = true,
        Some(false) => {}
        None if config.reverse => {
            log::warn!("reverse = true in the config is ignored for union runs");
            config.reverse = false;
        }
        None => {}
    }
    if let Some(sheet) = &args.sheet {
        config.sheet = sheet.clone();
    }

    let from_file = |p: &Option<String>| -> Option<PathBuf> {
        p.as_ref().map(|p| match &base_dir {
            Some(base) => base.join(p),
            None => PathBuf::from(p),
        })
    };
    let csv_dir = args.csv_dir.clone().or_else(|| from_file(&config.output.csv_dir));
    let json_out = args.output.clone().or_else(|| from_file(&config.output.json));

    log::debug!("settings: {config:?}, csv_dir {csv_dir:?}, json {json_out:?}");
    Ok(Settings { config, csv_dir, json_out })
}

fn load(path: &Path, sheet: &str) -> Result<Report, CliError> {
    let report = apptdiff_io::load_report(path, sheet).map_err(recon_err)?;
    log::info!(
        "{}: header at row {}, {} data rows",
        report.source,
        report.header_row + 1,
        report.rows.len()
    );
    Ok(report)
}

fn run_and_report(settings: &Settings, args: &RunArgs, input: &ReconInput) -> Result<(), CliError> {
    let result = apptdiff_recon::run(&settings.config, input).map_err(recon_err)?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(path) = &settings.json_out {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::general(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    } else {
        print!("{}", render_summary(&result, input));
    }

    if let Some(dir) = &settings.csv_dir {
        export_csv(dir, &result)?;
    }

    eprintln!("Done. Late adds found: {}", result.late_adds.len());

    if args.fail_on_late_adds && !result.late_adds.is_empty() {
        return Err(CliError {
            code: EXIT_LATE_ADDS,
            message: "late adds found".to_string(),
            hint: None,
        });
    }
    Ok(())
}

fn export_csv(dir: &Path, result: &ReconResult) -> Result<(), CliError> {
    let today = chrono::Local::now().date_naive();
    let mut lists = vec![(ExportKind::LateAdds, &result.late_adds)];
    if let Some(reverse) = &result.reverse {
        lists.push((ExportKind::Reverse, reverse));
    }

    for (kind, rows) in lists {
        if let Some(path) = export_projected(dir, kind, today, &result.columns, rows).map_err(recon_err)? {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

/// Totals block followed by the result tables.
fn render_summary(result: &ReconResult, input: &ReconInput) -> String {
    let target = &input.target().source;
    let baselines: Vec<&str> = input.baselines().iter().map(|r| r.source.as_str()).collect();
    let baseline_label = baselines.join(" + ");

    let mut out = String::new();
    for totals in &result.summary.inputs {
        out.push_str(&format!("{:<44} {}\n", format!("Rows in {}", totals.label), totals.rows));
    }
    for totals in &result.summary.inputs {
        out.push_str(&format!(
            "{:<44} {}\n",
            format!("Unique patients in {}", totals.label),
            totals.unique
        ));
    }
    out.push_str(&format!(
        "{:<44} {}\n",
        format!("Late adds ({target} not in {baseline_label})"),
        result.summary.late_adds
    ));
    if let Some(n) = result.summary.reverse {
        out.push_str(&format!("{:<44} {}\n", format!("{baseline_label} not in {target}"), n));
    }

    out.push_str("\nLate adds\n");
    out.push_str(&render_table(&result.columns, &result.late_adds));

    if let Some(reverse) = &result.reverse {
        out.push_str(&format!("\n{baseline_label} not in {target}\n"));
        out.push_str(&render_table(&result.columns, reverse));
    }
    out
}
