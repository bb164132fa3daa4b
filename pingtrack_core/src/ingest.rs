//! Skip-and-count driver: raw rows in, `TrackSet` and counts out.
//!
//! Nothing here logs. Skipped rows are handed to a caller-supplied callback
//! and totals come back as `IngestStats`.

use crate::columns::{ColumnSpec, RawRow};
use crate::error::ParseError;
use crate::parser::parse_row;
use crate::ping::Ping;
use crate::tracks::TrackSet;

/// Configuration for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Columns holding ID, TIMESTAMP, LAT, LON (default: those names)
    pub columns: ColumnSpec,

    /// Drop samples equal to one already in the track (default: true)
    pub dedupe: bool,

    /// Build tracks across identifiers in parallel (default: false)
    pub parallel: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            columns: ColumnSpec::default(),
            dedupe: true,
            parallel: false,
        }
    }
}

/// Counts for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Distinct identifiers in the result (set by `finish`)
    pub tracks: usize,
    /// Samples across all tracks after dedupe (set by `finish`)
    pub samples: usize,
}

impl IngestStats {
    pub fn rows_accepted(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}

/// A row the parser rejected.
#[derive(Debug)]
pub struct SkippedRow<'a> {
    /// 1-based position among all rows fed to the ingestor
    pub row_number: usize,
    pub error: &'a ParseError,
}

enum Sink {
    Sequential(TrackSet),
    Buffered(Vec<Ping>),
}

/// Accumulates rows from any number of inputs into one `TrackSet`.
pub struct Ingestor {
    config: IngestConfig,
    stats: IngestStats,
    sink: Sink,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        let sink = if config.parallel {
            Sink::Buffered(Vec::new())
        } else {
            Sink::Sequential(TrackSet::new())
        };
        Self {
            config,
            stats: IngestStats::default(),
            sink,
        }
    }

    /// Parses one row and folds it in.
    ///
    /// # Errors
    ///
    /// Returns the row's `ParseError`; the row is counted as skipped and the
    /// ingestor stays usable.
    pub fn feed<R: RawRow + ?Sized>(&mut self, row: &R) -> Result<(), ParseError> {
        self.stats.rows_read += 1;
        match parse_row(row, &self.config.columns) {
            Ok(ping) => {
                match &mut self.sink {
                    Sink::Sequential(set) => set.insert(ping, self.config.dedupe),
                    Sink::Buffered(pings) => pings.push(ping),
                }
                Ok(())
            }
            Err(e) => {
                self.stats.rows_skipped += 1;
                Err(e)
            }
        }
    }

    /// Feeds every row, reporting rejected ones through `on_skip`.
    pub fn feed_all<I, R, F>(&mut self, rows: I, mut on_skip: F)
    where
        I: IntoIterator<Item = R>,
        R: RawRow,
        F: FnMut(SkippedRow<'_>),
    {
        for row in rows {
            if let Err(error) = self.feed(&row) {
                on_skip(SkippedRow {
                    row_number: self.stats.rows_read,
                    error: &error,
                });
            }
        }
    }

    /// Counts so far; `tracks` and `samples` are only filled by `finish`.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Consumes the ingestor, returning the tracks and final counts.
    pub fn finish(self) -> (TrackSet, IngestStats) {
        let tracks = match self.sink {
            Sink::Sequential(set) => set,
            Sink::Buffered(pings) => TrackSet::from_pings_parallel(pings, self.config.dedupe),
        };
        let stats = IngestStats {
            tracks: tracks.len(),
            samples: tracks.sample_count(),
            ..self.stats
        };
        (tracks, stats)
    }
}

/// One-shot ingest of a single row source.
pub fn ingest<I, R, F>(rows: I, config: IngestConfig, on_skip: F) -> (TrackSet, IngestStats)
where
    I: IntoIterator<Item = R>,
    R: RawRow,
    F: FnMut(SkippedRow<'_>),
{
    let mut ingestor = Ingestor::new(config);
    ingestor.feed_all(rows, on_skip);
    ingestor.finish()
}
