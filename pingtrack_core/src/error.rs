//! Error types for row parsing and column selection.

use thiserror::Error;

use crate::columns::Column;

/// A row that could not be turned into a `Ping`.
///
/// Callers are expected to count and skip these; the variants only exist to
/// produce a useful message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A required column is absent from the row
    #[error("Missing field: {0}")]
    MissingField(Column),

    /// Timestamp is neither date/time text nor numeric epoch seconds
    #[error("Unparseable timestamp in {column}: {value:?}")]
    BadTimestamp { column: Column, value: String },

    /// Latitude or longitude is not a finite number
    #[error("Invalid coordinate in {column}: {value:?}")]
    BadCoordinate { column: Column, value: String },
}

impl ParseError {
    /// Creates a bad-timestamp error.
    pub fn timestamp(column: &Column, value: impl Into<String>) -> Self {
        Self::BadTimestamp {
            column: column.clone(),
            value: value.into(),
        }
    }

    /// Creates a bad-coordinate error.
    pub fn coordinate(column: &Column, value: impl Into<String>) -> Self {
        Self::BadCoordinate {
            column: column.clone(),
            value: value.into(),
        }
    }
}

/// A column selection string that does not name exactly four columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnSpecError {
    #[error("Expected 4 columns (ID, TIMESTAMP, LAT, LON), got {0}")]
    WrongCount(usize),

    #[error("Empty column name at position {0}")]
    EmptyColumn(usize),
}
