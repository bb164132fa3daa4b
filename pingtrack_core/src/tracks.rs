//! The Track Assembler - sorted, deduplicated per-entity sequences
//!
//! Each identifier owns a `Track`, a `Vec<Sample>` kept sorted after every
//! insertion. Positions are found by binary search (O(log n)); the insert
//! itself shifts the tail (O(n) worst case). Samples may arrive in any order
//! and from any number of inputs; the final track is the same.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::ping::{Ping, Sample};

// ============================================================================
// TRACK
// ============================================================================

/// The time-ordered position samples of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track {
    samples: Vec<Sample>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `sample` at its sorted position.
    ///
    /// The position is the upper bound: every element before it is `<= sample`.
    /// With `dedupe`, a sample equal to one already present is dropped.
    /// Without it, the new sample lands after its equals.
    pub fn insert(&mut self, sample: Sample, dedupe: bool) {
        let j = self.samples.partition_point(|s| *s <= sample);
        if dedupe && j > 0 && self.samples[j - 1] == sample {
            return;
        }
        self.samples.insert(j, sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// True if every adjacent pair is in non-decreasing order.
    pub fn is_sorted(&self) -> bool {
        self.samples.windows(2).all(|w| w[0] <= w[1])
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// ============================================================================
// TRACK SET
// ============================================================================

/// All tracks produced by one run, keyed by entity identifier.
///
/// Serializes as `{ "<id>": [[t, lat, lon], ...], ... }` with keys in
/// lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackSet {
    tracks: BTreeMap<String, Track>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one ping into the set. Never fails.
    pub fn insert(&mut self, ping: Ping, dedupe: bool) {
        let sample = ping.sample();
        match self.tracks.get_mut(&ping.id) {
            Some(track) => track.insert(sample, dedupe),
            None => {
                self.tracks.insert(ping.id, Track { samples: vec![sample] });
            }
        }
    }

    /// Builds a set by inserting pings one at a time, in arrival order.
    pub fn from_pings<I>(pings: I, dedupe: bool) -> Self
    where
        I: IntoIterator<Item = Ping>,
    {
        let mut set = Self::new();
        for ping in pings {
            set.insert(ping, dedupe);
        }
        set
    }

    /// Builds a set with one rayon task per identifier.
    ///
    /// Pings are first partitioned by id (keeping arrival order within each
    /// partition); each partition is then folded into its own track. No two
    /// tasks ever touch the same track.
    pub fn from_pings_parallel<I>(pings: I, dedupe: bool) -> Self
    where
        I: IntoIterator<Item = Ping>,
    {
        let mut partitions: HashMap<String, Vec<Sample>> = HashMap::new();
        for ping in pings {
            let sample = ping.sample();
            partitions.entry(ping.id).or_default().push(sample);
        }

        let tracks: BTreeMap<String, Track> = partitions
            .into_par_iter()
            .map(|(id, samples)| {
                let mut track = Track::new();
                for sample in samples {
                    track.insert(sample, dedupe);
                }
                (id, track)
            })
            .collect();

        Self { tracks }
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Number of tracks (distinct identifiers).
    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total samples across all tracks.
    pub fn sample_count(&self) -> usize {
        self.tracks.values().map(Track::len).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Track)> {
        self.tracks.iter().map(|(id, track)| (id.as_str(), track))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ping(id: &str, t: f64, lat: f64, lon: f64) -> Ping {
        Ping::new(id, t, lat, lon)
    }

    #[test]
    fn test_first_insert_creates_track() {
        let mut set = TrackSet::new();
        set.insert(ping("A", 5.0, 1.0, 2.0), true);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().as_slice(), &[Sample::new(5.0, 1.0, 2.0)]);
    }

    #[test]
    fn test_out_of_order_inserts_stay_sorted() {
        let mut set = TrackSet::new();
        for t in [5.0, 1.0, 3.0, 4.0, 2.0, 0.0] {
            set.insert(ping("A", t, 0.0, 0.0), true);
        }
        let track = set.get("A").unwrap();
        assert!(track.is_sorted());
        let times: Vec<f64> = track.iter().map(Sample::timestamp).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_dedupe_drops_repeats() {
        let mut set = TrackSet::new();
        set.insert(ping("A", 1.0, 10.0, 20.0), true);
        set.insert(ping("A", 1.0, 10.0, 20.0), true);
        assert_eq!(set.get("A").unwrap().len(), 1);

        // Same time, different position is a different sample
        set.insert(ping("A", 1.0, 10.0, 21.0), true);
        assert_eq!(set.get("A").unwrap().len(), 2);
    }

    #[test]
    fn test_dedupe_catches_repeat_in_middle() {
        let mut track = Track::new();
        for t in [1.0, 2.0, 3.0] {
            track.insert(Sample::new(t, 0.0, 0.0), true);
        }
        track.insert(Sample::new(2.0, 0.0, 0.0), true);
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_without_dedupe_keeps_adjacent_copies() {
        let mut set = TrackSet::new();
        set.insert(ping("A", 2.0, 0.0, 0.0), false);
        set.insert(ping("A", 1.0, 10.0, 20.0), false);
        set.insert(ping("A", 1.0, 10.0, 20.0), false);

        let track = set.get("A").unwrap();
        assert_eq!(track.len(), 3);
        assert!(track.is_sorted());
        assert_eq!(track.as_slice()[0], track.as_slice()[1]);
        assert_eq!(track.last().unwrap().timestamp(), 2.0);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let mut set = TrackSet::new();
        set.insert(ping("A", 1.0, 10.0, 20.0), true);
        set.insert(ping("B", 1.0, 10.0, 20.0), true);

        assert_eq!(set.len(), 2);
        assert_eq!(set.sample_count(), 2);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let t0 = 1_609_459_200.0;
        let t1 = 1_609_459_201.0;
        let set = TrackSet::from_pings(
            vec![
                ping("A", t1, 10.0, 20.0),
                ping("A", t0, 9.0, 19.0),
                ping("A", t1, 10.0, 20.0),
            ],
            true,
        );
        assert_eq!(
            set.get("A").unwrap().as_slice(),
            &[Sample::new(t0, 9.0, 19.0), Sample::new(t1, 10.0, 20.0)]
        );
    }

    #[test]
    fn test_serializes_as_object_of_triples() {
        let set = TrackSet::from_pings(
            vec![ping("B", 2.0, 3.0, 4.0), ping("A", 1.0, 2.0, 3.0)],
            true,
        );
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"A":[[1.0,2.0,3.0]],"B":[[2.0,3.0,4.0]]}"#);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pings: Vec<Ping> = (0..500)
            .map(|i| {
                let id = format!("dev-{}", i % 7);
                let t = ((i * 37) % 101) as f64;
                ping(&id, t, (i % 3) as f64, 0.5)
            })
            .collect();

        let sequential = TrackSet::from_pings(pings.clone(), true);
        let parallel = TrackSet::from_pings_parallel(pings, true);
        assert_eq!(sequential, parallel);
    }

    fn arb_samples() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        // Small ranges so duplicates are common
        prop::collection::vec(
            (0u8..20, -3i8..3, -3i8..3)
                .prop_map(|(t, lat, lon)| (f64::from(t), f64::from(lat), f64::from(lon))),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn prop_order_independent_with_dedupe(samples in arb_samples()) {
            let forward = TrackSet::from_pings(
                samples.iter().map(|&(t, lat, lon)| ping("A", t, lat, lon)),
                true,
            );
            let backward = TrackSet::from_pings(
                samples.iter().rev().map(|&(t, lat, lon)| ping("A", t, lat, lon)),
                true,
            );
            prop_assert_eq!(&forward, &backward);

            if let Some(track) = forward.get("A") {
                prop_assert!(track.as_slice().windows(2).all(|w| w[0] < w[1]));
            }
        }

        #[test]
        fn prop_without_dedupe_keeps_every_sample(samples in arb_samples()) {
            let set = TrackSet::from_pings(
                samples.iter().map(|&(t, lat, lon)| ping("A", t, lat, lon)),
                false,
            );
            let len = set.get("A").map_or(0, Track::len);
            prop_assert_eq!(len, samples.len());
            if let Some(track) = set.get("A") {
                prop_assert!(track.is_sorted());
            }
        }
    }
}
