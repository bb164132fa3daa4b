//! Errors that abort a CLI run.
//!
//! Unparseable rows are not errors at this level; they are counted and skipped.

use std::path::PathBuf;
use thiserror::Error;

use pingtrack_core::ColumnSpecError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Opening or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader could not produce a record
    #[error("CSV error in {input}: {source}")]
    Csv {
        input: String,
        #[source]
        source: csv::Error,
    },

    /// `--columns` did not name four columns
    #[error("Invalid --columns value: {0}")]
    Columns(#[from] ColumnSpecError),

    /// The worker pool for parallel assembly could not start
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CliError {
    /// Creates an I/O error tagged with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error tagged with the input's display name.
    pub fn csv(input: impl std::fmt::Display, source: csv::Error) -> Self {
        Self::Csv {
            input: input.to_string(),
            source,
        }
    }
}
