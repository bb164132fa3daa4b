//! PingTrack CLI
//!
//! Read CSV files of pings and write per-entity tracks as JSON.

use clap::Parser;
use pingtrack_cli::{run, InputSource, OutputTarget, RunOptions};
use pingtrack_core::{ColumnSpec, IngestConfig};
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Assemble geolocation pings into sorted, deduplicated per-entity tracks
///
/// CSV inputs need (at least) ID, TIMESTAMP, LAT and LON columns.
/// Rows that fail to parse are dropped.
#[derive(Parser, Debug)]
#[command(name = "pingtrack")]
#[command(version)]
struct Args {
    /// File(s) to ingest; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    infiles: Vec<String>,

    /// Output file [default: stdout]
    #[arg(short, long)]
    outfile: Option<String>,

    /// Comma-separated 0-based indices or names of the ID, TIMESTAMP, LAT, LON columns
    #[arg(short, long, default_value = "ID,TIMESTAMP,LAT,LON")]
    columns: String,

    /// Keep repeated samples instead of dropping them
    #[arg(long)]
    no_dedupe: bool,

    /// Worker threads for track assembly (1 = sequential, 0 = one per core)
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Verbose output (logs every skipped row)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_options(self) -> Result<RunOptions, pingtrack_cli::CliError> {
        let columns: ColumnSpec = self.columns.parse()?;

        let inputs = if self.infiles.is_empty() {
            vec![InputSource::Stdin]
        } else {
            self.infiles.iter().map(|f| InputSource::from_arg(f)).collect()
        };

        Ok(RunOptions {
            inputs,
            output: OutputTarget::from_arg(self.outfile.as_deref()),
            ingest: IngestConfig {
                columns,
                dedupe: !self.no_dedupe,
                parallel: self.jobs != 1,
            },
            jobs: self.jobs,
            pretty: self.pretty,
        })
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging; stdout may carry the JSON, so logs go to stderr
    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let result = args.into_options().and_then(|options| run(&options));

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_read_stdin_sequentially() {
        let options = Args::parse_from(["pingtrack"]).into_options().unwrap();
        assert_eq!(options.inputs, vec![InputSource::Stdin]);
        assert_eq!(options.output, OutputTarget::Stdout);
        assert_eq!(options.ingest.columns, ColumnSpec::default());
        assert!(options.ingest.dedupe);
        assert!(!options.ingest.parallel);
    }

    #[test]
    fn test_flags_map_onto_options() {
        let options = Args::parse_from([
            "pingtrack", "a.csv", "-", "-o", "out.json", "-c", "0,3,1,2", "--no-dedupe", "-j", "0",
        ])
        .into_options()
        .unwrap();

        assert_eq!(options.inputs.len(), 2);
        assert_eq!(options.inputs[1], InputSource::Stdin);
        assert_eq!(options.output, OutputTarget::File("out.json".into()));
        assert_eq!(options.ingest.columns.timestamp, pingtrack_core::Column::Index(3));
        assert!(!options.ingest.dedupe);
        assert!(options.ingest.parallel);
        assert_eq!(options.jobs, 0);
    }

    #[test]
    fn test_bad_columns_are_rejected() {
        let err = Args::parse_from(["pingtrack", "-c", "ID,TIMESTAMP"])
            .into_options()
            .unwrap_err();
        assert!(err.to_string().contains("Expected 4 columns"));
    }
}
