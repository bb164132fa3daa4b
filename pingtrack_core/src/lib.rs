//! PingTrack Core - per-entity tracks from geolocation pings
//!
//! Two stages, run in order:
//! 1. **Row Parser**: a raw record plus a four-column selection becomes a
//!    validated `Ping`, or a `ParseError` the caller counts and skips.
//! 2. **Track Assembler**: each `Ping` is folded into a `TrackSet`, one
//!    sorted, optionally deduplicated `Track` per identifier.
//!
//! The `ingest` module wires the two together for callers that just want
//! rows in and tracks out. Nothing in this crate performs I/O or logs.

pub mod columns;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod ping;
pub mod tracks;

// Re-export key types for convenience
pub use columns::{Column, ColumnSpec, RawRow, DEFAULT_COLUMNS};
pub use error::{ColumnSpecError, ParseError};
pub use ingest::{ingest, IngestConfig, IngestStats, Ingestor, SkippedRow};
pub use parser::{parse_row, parse_timestamp};
pub use ping::{Ping, Sample};
pub use tracks::{Track, TrackSet};
