use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be turned into a well-formed dataset.
    Parse,
    /// The caller passed arguments the operation cannot work with.
    InvalidArgument,
    /// Datasets handed to the aggregator do not share a timestamp sequence.
    Alignment,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row {row}: cannot parse timestamp '{value}' (expected MM/DD/YYYY HH:MM:SS)")]
    Timestamp {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("row {row}: column '{column}' holds '{value}', not a non-negative integer")]
    Counter {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row} has {found} fields but the dataset has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dataset {index} is not aligned with the first dataset: {reason}")]
    Alignment { index: usize, reason: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. }
            | Error::Csv(_)
            | Error::MissingColumn(_)
            | Error::DuplicateColumn(_)
            | Error::Timestamp { .. }
            | Error::Counter { .. }
            | Error::RowWidth { .. } => ErrorKind::Parse,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Alignment { .. } => ErrorKind::Alignment,
        }
    }
}
