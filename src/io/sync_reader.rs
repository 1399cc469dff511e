//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over scripted events from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in row errors for debugging
//!
//! Rows are read one at a time, so memory use does not grow with the
//! script length.

use crate::io::csv_format::{convert_csv_event, CsvEvent};
use crate::io::open_error;
use crate::types::{EarnflowError, ScriptedEvent};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// ```no_run
/// use earnflow_engine::io::sync_reader::SyncReader;
/// use std::path::Path;
///
/// let reader = SyncReader::new(Path::new("events.csv")).unwrap();
/// let events: Vec<_> = reader.filter_map(Result::ok).collect();
/// println!("Parsed {} events", events.len());
/// ```
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open an event script for streaming iteration
    ///
    /// Fields are trimmed and rows may omit trailing columns.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` or `IoError` if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, EarnflowError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<ScriptedEvent, EarnflowError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvEvent>();
        let row = deserializer.next()?;

        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        Some(
            row.map_err(|e| EarnflowError::ParseError {
                line: Some(line),
                message: e.to_string(),
            })
            .and_then(|csv_event| {
                convert_csv_event(csv_event).map_err(|e| EarnflowError::ParseError {
                    line: Some(line),
                    message: e.to_string(),
                })
            }),
        )
    }
}
