//! The Row Parser - raw record to validated `Ping`
//!
//! Timestamps are resolved in two explicit steps:
//! 1. Date/time text (RFC 3339, RFC 2822 and a list of common ISO-like,
//!    slash, month-name and 12-hour clock layouts). Values without an offset,
//!    or with a `Z`/`UTC`/`GMT` marker, are UTC.
//! 2. Numeric epoch seconds, for columns that are already Unix timestamps.
//!
//! Any failure yields a `ParseError`; the row is meant to be skipped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::columns::{Column, ColumnSpec, RawRow};
use crate::error::ParseError;
use crate::ping::Ping;

/// Layouts carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    // Bare-hour offsets such as `+00` or `-05`
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

/// Date and time layouts without an offset (read as UTC).
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d %B %Y %H:%M:%S%.f",
    "%B %d %Y %H:%M:%S%.f",
    "%B %d, %Y %H:%M:%S%.f",
    "%a %B %d %H:%M:%S %Y",
    "%A, %B %d, %Y %H:%M:%S%.f",
    "%A %B %d %Y %H:%M:%S%.f",
    "%Y%m%dT%H%M%S%.f",
    // 12-hour clock
    "%Y-%m-%d %I:%M:%S%.f %p",
    "%Y-%m-%d %I:%M %p",
    "%m/%d/%Y %I:%M:%S%.f %p",
    "%m/%d/%Y %I:%M %p",
    "%b %d %Y %I:%M:%S%.f %p",
    "%b %d, %Y %I:%M:%S%.f %p",
];

/// Date-only layouts (midnight UTC).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%A, %B %d, %Y",
];

/// Parses one raw record into a `Ping`.
///
/// # Errors
///
/// `ParseError` if any of the four columns is missing, the timestamp is
/// neither date/time text nor a number, or a coordinate is not finite.
pub fn parse_row<R: RawRow + ?Sized>(row: &R, columns: &ColumnSpec) -> Result<Ping, ParseError> {
    let raw_ts = require(row, &columns.timestamp)?;
    let timestamp =
        parse_timestamp(raw_ts).ok_or_else(|| ParseError::timestamp(&columns.timestamp, raw_ts))?;

    let id = require(row, &columns.id)?.to_string();
    let latitude = parse_coordinate(row, &columns.latitude)?;
    let longitude = parse_coordinate(row, &columns.longitude)?;

    Ok(Ping {
        id,
        timestamp,
        latitude,
        longitude,
    })
}

/// Resolves a timestamp string to seconds since the Unix epoch.
///
/// Date/time text is tried first; if the value is not date-shaped it is read
/// as numeric epoch seconds. Returns `None` when neither works.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    parse_datetime(raw).or_else(|| parse_epoch_seconds(raw))
}

/// Date/time text to epoch seconds.
pub fn parse_datetime(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(epoch_seconds(&dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(epoch_seconds(&dt));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(epoch_seconds(&dt));
    }

    let naive = strip_utc_suffix(raw);

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
    {
        return Some(epoch_seconds(&dt.and_utc()));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(naive, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| epoch_seconds(&dt.and_utc()))
}

/// Drops a trailing `Z`, `UTC` or `GMT` marker from an otherwise naive value.
fn strip_utc_suffix(raw: &str) -> &str {
    for suffix in ["UTC", "GMT", "Z"] {
        let split = raw.len().saturating_sub(suffix.len());
        if raw.is_char_boundary(split) && raw[split..].eq_ignore_ascii_case(suffix) {
            return raw[..split].trim_end();
        }
    }
    raw
}

/// Raw numeric epoch seconds; rejects NaN and infinities.
pub fn parse_epoch_seconds(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn epoch_seconds<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

fn require<'a, R: RawRow + ?Sized>(row: &'a R, column: &Column) -> Result<&'a str, ParseError> {
    row.field(column)
        .ok_or_else(|| ParseError::MissingField(column.clone()))
}

fn parse_coordinate<R: RawRow + ?Sized>(row: &R, column: &Column) -> Result<f64, ParseError> {
    let raw = require(row, column)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::coordinate(column, raw))
}
