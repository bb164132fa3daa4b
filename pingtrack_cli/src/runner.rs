//! One end-to-end run: read every input, assemble tracks, write JSON.

use tracing::info;

use pingtrack_core::{IngestConfig, IngestStats, Ingestor, TrackSet};

use crate::error::CliError;
use crate::input::{read_csv, InputSource};
use crate::output::OutputTarget;

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// CSV sources, read in order into one track set
    pub inputs: Vec<InputSource>,

    pub output: OutputTarget,

    pub ingest: IngestConfig,

    /// Worker threads for parallel assembly (0 = one per core).
    /// Only consulted when `ingest.parallel` is set.
    pub jobs: usize,

    pub pretty: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            inputs: vec![InputSource::Stdin],
            output: OutputTarget::Stdout,
            ingest: IngestConfig::default(),
            jobs: 1,
            pretty: false,
        }
    }
}

/// Reads all inputs and assembles the track set without writing it.
pub fn assemble(options: &RunOptions) -> Result<(TrackSet, IngestStats), CliError> {
    info!("reading inputs");

    let mut ingestor = Ingestor::new(options.ingest.clone());
    for source in &options.inputs {
        let reader = source.open()?;
        let rows = read_csv(reader, source, &mut ingestor)?;
        info!("read {} rows from {}", rows, source);
    }

    let (tracks, stats) = if options.ingest.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()?;
        pool.install(|| ingestor.finish())
    } else {
        ingestor.finish()
    };

    info!(
        "read {} rows from {} inputs",
        stats.rows_read,
        options.inputs.len()
    );
    info!("failed to parse {} rows", stats.rows_skipped);
    info!("made tracks for {} ids ({} samples)", stats.tracks, stats.samples);

    Ok((tracks, stats))
}

/// Runs the whole pipeline and writes the result to `options.output`.
pub fn run(options: &RunOptions) -> Result<IngestStats, CliError> {
    let (tracks, stats) = assemble(options)?;

    info!("writing tracks to {}", options.output);
    options.output.write(&tracks, options.pretty)?;

    info!("end");
    Ok(stats)
}
