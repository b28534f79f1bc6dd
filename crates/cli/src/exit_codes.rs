//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 1    | General error, or late adds found with `--fail-on-late-adds` |
//! | 2    | CLI usage error (bad args)                                 |
//! | 3    | Input load failure (no sheet, no header row, unreadable)   |
//! | 4    | Invalid config (parse or validation)                       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use apptdiff_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Late adds were found and `--fail-on-late-adds` was given.
/// Like `diff(1)`, exit 1 means "schedules differ."
pub const EXIT_LATE_ADDS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// An input file could not be turned into a report.
pub const EXIT_LOAD: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        e if e.is_load_failure() => EXIT_LOAD,
        _ => EXIT_ERROR,
    }
}
