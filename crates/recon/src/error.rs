use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank sheet name, duplicate column, etc.).
    ConfigValidation(String),
    /// The workbook has no sheets at all.
    NoSheet { file: String },
    /// Neither detection pass found a header row within the scan bound.
    HeaderNotFound { file: String },
    /// The spreadsheet reader rejected the file.
    Workbook { file: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl ReconError {
    /// True for failures raised while turning an input file into a report.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::NoSheet { .. } | Self::HeaderNotFound { .. } | Self::Workbook { .. } | Self::Io(_)
        )
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::NoSheet { file } => write!(f, "No sheets found in {file}"),
            Self::HeaderNotFound { file } => write!(f, "Could not detect header row in {file}"),
            Self::Workbook { file, message } => write!(f, "cannot read {file}: {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
