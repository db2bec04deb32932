//! Interval table I/O
//!
//! Readers turning tabular interval files into typed [`IntervalRecord`](crate::types::IntervalRecord)s.

pub mod bed;

pub use bed::{BedError, BedReader, ColumnType, SchemaOverrides};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Open a text file for line reading, decompressing `.gz` transparently.
pub fn open_text<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".gz") || path_str.ends_with(".bgz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
