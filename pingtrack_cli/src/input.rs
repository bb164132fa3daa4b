//! CSV inputs: where rows come from and how columns are looked up.

use csv::{ReaderBuilder, StringRecord};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;

use pingtrack_core::{Column, Ingestor, RawRow};

use crate::error::CliError;

/// A CSV source: a file on disk or standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn open(&self) -> Result<Box<dyn Read>, CliError> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
            InputSource::File(path) => File::open(path)
                .map(|f| Box::new(f) as Box<dyn Read>)
                .map_err(|e| CliError::io(path.clone(), e)),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One CSV record viewed through its header row.
///
/// Names resolve against the header (first match wins); indices address the
/// record directly.
pub struct CsvRow<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> CsvRow<'a> {
    pub fn new(headers: &'a StringRecord, record: &'a StringRecord) -> Self {
        Self { headers, record }
    }
}

impl RawRow for CsvRow<'_> {
    fn field(&self, column: &Column) -> Option<&str> {
        match column {
            Column::Name(name) => self
                .headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| self.record.get(i)),
            Column::Index(i) => self.record.get(*i),
        }
    }
}

/// Feeds every record of one CSV stream into `ingestor`.
///
/// Rows the parser rejects are logged at debug level and skipped. Returns the
/// number of records read from this stream.
pub fn read_csv<R: Read>(
    reader: R,
    source: &InputSource,
    ingestor: &mut Ingestor,
) -> Result<usize, CliError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| CliError::csv(source, e))?
        .clone();

    let mut record = StringRecord::new();
    let mut count = 0;
    while rdr
        .read_record(&mut record)
        .map_err(|e| CliError::csv(source, e))?
    {
        count += 1;
        let row = CsvRow::new(&headers, &record);
        if let Err(e) = ingestor.feed(&row) {
            debug!(
                "{} for row {} ({} line {}): {:?}",
                e,
                ingestor.stats().rows_read,
                source,
                record.position().map_or(0, |p| p.line()),
                record
            );
        }
    }

    Ok(count)
}
