//! I/O module
//!
//! Handles event script parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (event conversion, output serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_event, write_ledger_csv, write_summaries_csv, CsvEvent};
pub use sync_reader::SyncReader;

use crate::types::EarnflowError;
use std::path::Path;

/// Map a failure to open an input script to a fatal error
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> EarnflowError {
    if error.kind() == std::io::ErrorKind::NotFound {
        EarnflowError::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        EarnflowError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        }
    }
}
