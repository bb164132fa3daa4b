//! JSON writer for the finished `TrackSet`.
//!
//! Output is one object per run: `{ "<id>": [[t, lat, lon], ...], ... }`.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use pingtrack_core::TrackSet;

use crate::error::CliError;

/// Where the JSON goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Writes `tracks` to this target.
    pub fn write(&self, tracks: &TrackSet, pretty: bool) -> Result<(), CliError> {
        match self {
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                write_tracks(stdout.lock(), tracks, pretty).map_err(|e| CliError::io("<stdout>", e))
            }
            OutputTarget::File(path) => {
                let file = File::create(path).map_err(|e| CliError::io(path.clone(), e))?;
                write_tracks(BufWriter::new(file), tracks, pretty)
                    .map_err(|e| CliError::io(path.clone(), e))
            }
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Serializes `tracks` as JSON followed by a newline, then flushes.
pub fn write_tracks<W: Write>(mut writer: W, tracks: &TrackSet, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, tracks)?;
    } else {
        serde_json::to_writer(&mut writer, tracks)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()
}
