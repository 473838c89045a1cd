use thiserror::Error;

/// All errors produced by the bike-sharing dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A field could not be parsed (malformed date, non-numeric count,
    /// missing column).
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// A parsed value violates a record invariant (code outside 1-4, flag
    /// not 0/1, negative count, `cnt != casual + registered`).
    #[error("Validation error at row {row}: {message}")]
    Validation { row: usize, message: String },

    /// The data source could not be opened or fetched.
    #[error("Data source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// The CSV stream itself is malformed (bad quoting, ragged rows, ...).
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// The persisted last-used parameters could not be decoded or encoded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure while reading or writing dashboard state.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn parse(row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            message: message.into(),
        }
    }

    pub fn validation(row: usize, message: impl Into<String>) -> Self {
        Self::Validation {
            row,
            message: message.into(),
        }
    }

    pub fn source_unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
