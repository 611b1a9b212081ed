use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not access file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cash transactions would overwrite {}", .path.display())]
    SameOutput { path: PathBuf },
    #[error("invalid transactions file")]
    Format(#[from] FormatError),
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// The input does not follow the FinPension export layout.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("could not parse CSV rows")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid number {value:?} in column {column:?} on line {line}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("invalid date {value:?} on line {line}")]
    InvalidDate { line: u64, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
