//! Shared value types: the validated `Ping` and its ordering key, `Sample`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One validated observation of an entity's position at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    /// Entity identifier, copied verbatim from the input row
    pub id: String,

    /// Seconds since the Unix epoch (not necessarily integral)
    pub timestamp: f64,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Ping {
    /// Creates a new ping.
    pub fn new(id: impl Into<String>, timestamp: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            timestamp,
            latitude,
            longitude,
        }
    }

    /// Returns the ordering-relevant projection of this ping.
    #[inline]
    pub fn sample(&self) -> Sample {
        Sample::new(self.timestamp, self.latitude, self.longitude)
    }
}

/// A `(timestamp, latitude, longitude)` position sample.
///
/// Samples compare lexicographically: timestamp first, then latitude, then
/// longitude. Equality under that ordering is what deduplication uses.
///
/// Serialized as a 3-element array `[t, lat, lon]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Sample {
    timestamp: f64,
    latitude: f64,
    longitude: f64,
}

impl Sample {
    /// Creates a sample from finite components.
    ///
    /// Negative zero is folded into positive zero so that `Eq` and `Ord`
    /// agree with numeric equality.
    pub fn new(timestamp: f64, latitude: f64, longitude: f64) -> Self {
        debug_assert!(
            timestamp.is_finite() && latitude.is_finite() && longitude.is_finite(),
            "non-finite sample ({timestamp}, {latitude}, {longitude})"
        );
        Self {
            timestamp: timestamp + 0.0,
            latitude: latitude + 0.0,
            longitude: longitude + 0.0,
        }
    }

    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the sample as a plain tuple.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.timestamp, self.latitude, self.longitude)
    }
}

impl From<&Ping> for Sample {
    fn from(ping: &Ping) -> Self {
        ping.sample()
    }
}

impl From<(f64, f64, f64)> for Sample {
    fn from((timestamp, latitude, longitude): (f64, f64, f64)) -> Self {
        Self::new(timestamp, latitude, longitude)
    }
}

impl From<Sample> for (f64, f64, f64) {
    fn from(sample: Sample) -> Self {
        sample.as_tuple()
    }
}

impl Ord for Sample {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .total_cmp(&other.timestamp)
            .then_with(|| self.latitude.total_cmp(&other.latitude))
            .then_with(|| self.longitude.total_cmp(&other.longitude))
    }
}

impl PartialOrd for Sample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Sample {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_orders_by_timestamp_first() {
        let early = Sample::new(1.0, 50.0, 50.0);
        let late = Sample::new(2.0, -50.0, -50.0);
        assert!(early < late);
    }

    #[test]
    fn test_sample_breaks_ties_on_lat_then_lon() {
        let a = Sample::new(1.0, 10.0, 30.0);
        let b = Sample::new(1.0, 11.0, 0.0);
        let c = Sample::new(1.0, 11.0, 1.0);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        let a = Sample::new(0.0, -0.0, 0.0);
        let b = Sample::new(0.0, 0.0, -0.0);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_sample_serializes_as_triple() {
        let ping = Ping::new("A", 1.5, 10.0, 20.0);
        let json = serde_json::to_string(&ping.sample()).unwrap();
        assert_eq!(json, "[1.5,10.0,20.0]");

        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ping.sample());
    }
}
