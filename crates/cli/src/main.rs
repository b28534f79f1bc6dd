// apptdiff - find appointments added to a schedule after it was first printed

mod exit_codes;
mod headers;
mod recon;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use recon::RunArgs;

#[derive(Parser)]
#[command(name = "apptdiff")]
#[command(about = "Compare appointment schedule exports and list late adds")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rows in TARGET whose patient is not in BASELINE
    #[command(after_help = "\
Examples:
  apptdiff compare revised.xlsx reprint.xlsx
  apptdiff compare revised.xlsx reprint.xlsx --reverse --csv-dir out
  apptdiff compare revised.xlsx reprint.xlsx --strict --json
  apptdiff compare revised.csv reprint.csv --fail-on-late-adds")]
    Compare {
        /// Earlier schedule export (the revised print)
        baseline: PathBuf,

        /// Current schedule export (the reprint)
        target: PathBuf,

        /// Also list baseline rows missing from the target
        #[arg(long)]
        reverse: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Rows in TARGET whose patient is in neither baseline
    #[command(after_help = "\
Examples:
  apptdiff union monday.xlsx tuesday.xlsx reprint.xlsx
  apptdiff union monday.xlsx tuesday.xlsx reprint.xlsx --output result.json")]
    Union {
        /// First baseline export
        baseline: PathBuf,

        /// Second baseline export
        extra_baseline: PathBuf,

        /// Current schedule export
        target: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show the detected sheet, header row and key columns of a file
    #[command(after_help = "\
Examples:
  apptdiff headers reprint.xlsx
  apptdiff headers export.xlsx --sheet Sheet2 --json")]
    Headers {
        file: PathBuf,

        /// Sheet to read (defaults to MasterAppointmentsWithInsurance, else the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file without running
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  apptdiff-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare { baseline, target, reverse, run } => {
            recon::cmd_compare(baseline, target, reverse, run)
        }
        Commands::Union { baseline, extra_baseline, target, run } => {
            recon::cmd_union(baseline, extra_baseline, target, run)
        }
        Commands::Headers { file, sheet, json } => headers::cmd_headers(file, sheet, json),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}
