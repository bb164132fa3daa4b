//! PingTrack command-line front end
//!
//! Glue around `pingtrack_core`: opens CSV inputs, resolves the four
//! columns by header name or index, runs the ingest driver and writes the
//! resulting `TrackSet` as one JSON object.
//!
//! # Usage
//!
//! ```text
//! pingtrack pings-a.csv pings-b.csv -o tracks.json
//! pingtrack -c device,ts,lat,lon < pings.csv
//! pingtrack -c 0,3,1,2 --no-dedupe --jobs 0 pings.csv
//! ```

mod error;
mod input;
mod output;
mod runner;

pub use error::CliError;
pub use input::{read_csv, CsvRow, InputSource};
pub use output::{write_tracks, OutputTarget};
pub use runner::{assemble, run, RunOptions};
