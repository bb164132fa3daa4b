//! Column selection and the raw-record abstraction the parser reads from.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

use crate::error::ColumnSpecError;

/// Default column names, in ID, TIMESTAMP, LAT, LON order.
pub const DEFAULT_COLUMNS: [&str; 4] = ["ID", "TIMESTAMP", "LAT", "LON"];

/// A column addressed by header name or by 0-based position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Name(String),
    Index(usize),
}

impl Column {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// All-digit tokens are indices; anything else is a header name.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = token.parse() {
                return Self::Index(index);
            }
        }
        Self::Name(token.to_string())
    }
}

impl FromStr for Column {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Name(name) => write!(f, "column '{name}'"),
            Column::Index(index) => write!(f, "column #{index}"),
        }
    }
}

/// The four columns a ping is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub id: Column,
    pub timestamp: Column,
    pub latitude: Column,
    pub longitude: Column,
}

impl ColumnSpec {
    pub fn new(id: Column, timestamp: Column, latitude: Column, longitude: Column) -> Self {
        Self {
            id,
            timestamp,
            latitude,
            longitude,
        }
    }

    /// Columns in ID, TIMESTAMP, LAT, LON order.
    pub fn as_array(&self) -> [&Column; 4] {
        [&self.id, &self.timestamp, &self.latitude, &self.longitude]
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        let [id, timestamp, latitude, longitude] = DEFAULT_COLUMNS.map(Column::name);
        Self::new(id, timestamp, latitude, longitude)
    }
}

impl FromStr for ColumnSpec {
    type Err = ColumnSpecError;

    /// Parses a comma-separated list such as `"ID,TIMESTAMP,LAT,LON"` or `"0,3,1,2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
        if let Some(pos) = tokens.iter().position(|t| t.is_empty()) {
            if tokens.len() == 4 {
                return Err(ColumnSpecError::EmptyColumn(pos));
            }
        }

        let columns: Vec<Column> = tokens.into_iter().map(Column::from_token).collect();
        let [id, timestamp, latitude, longitude]: [Column; 4] = columns
            .try_into()
            .map_err(|rest: Vec<Column>| ColumnSpecError::WrongCount(rest.len()))?;
        Ok(Self::new(id, timestamp, latitude, longitude))
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .as_array()
            .iter()
            .map(|c| match c {
                Column::Name(name) => name.clone(),
                Column::Index(index) => index.to_string(),
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// A raw tabular record the row parser can pull string fields out of.
pub trait RawRow {
    /// Returns the raw value of `column`, or `None` if the row has no such column.
    fn field(&self, column: &Column) -> Option<&str>;
}

impl<S: BuildHasher> RawRow for HashMap<String, String, S> {
    fn field(&self, column: &Column) -> Option<&str> {
        match column {
            Column::Name(name) => self.get(name).map(String::as_str),
            Column::Index(_) => None,
        }
    }
}

impl RawRow for BTreeMap<String, String> {
    fn field(&self, column: &Column) -> Option<&str> {
        match column {
            Column::Name(name) => self.get(name).map(String::as_str),
            Column::Index(_) => None,
        }
    }
}

impl RawRow for [String] {
    fn field(&self, column: &Column) -> Option<&str> {
        match column {
            Column::Index(index) => self.get(*index).map(String::as_str),
            Column::Name(_) => None,
        }
    }
}

impl RawRow for Vec<String> {
    fn field(&self, column: &Column) -> Option<&str> {
        self.as_slice().field(column)
    }
}

impl<R: RawRow + ?Sized> RawRow for &R {
    fn field(&self, column: &Column) -> Option<&str> {
        (**self).field(column)
    }
}
