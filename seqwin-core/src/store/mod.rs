//! Random-access sequence stores
//!
//! A store maps a sequence name and a half-open, 0-based `[start, end)` range to the
//! literal bases, and reports sequence lengths. Stores are read-only once opened.
//!
//! - [`MemoryStore`]: every sequence held in memory (plain or gzipped FASTA/FASTQ)
//! - [`IndexedFastaStore`]: memory-mapped FASTA addressed through a `.fai` index

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub mod indexed;
pub mod memory;

pub use indexed::{build_fai, fai_path, read_fai, write_fai, IndexedFastaStore};
pub use noodles::fasta::fai;
pub use memory::MemoryStore;

/// Errors that can occur while opening or reading a sequence store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),

    #[error("Region {name}:{start}-{end} out of bounds (sequence length {length})")]
    OutOfBounds {
        name: String,
        start: u64,
        end: u64,
        length: u64,
    },

    #[error("Window {name}:{start}-{end} is too large to resolve")]
    WindowTooLarge { name: String, start: i64, end: i64 },

    #[error("Invalid FASTA index: {0}")]
    InvalidIndex(String),

    #[error("FASTA parse error: {0}")]
    Parse(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to a collection of named sequences.
pub trait SequenceStore {
    /// Length of `name`, or [`StoreError::SequenceNotFound`].
    fn length(&self, name: &str) -> StoreResult<u64>;

    /// Bases of `name` in `[start, end)`; requires `start <= end <= length(name)`.
    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>>;

    /// Sequence names in file order.
    fn names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.length(name).is_ok()
    }
}

impl<S: SequenceStore + ?Sized> SequenceStore for &S {
    fn length(&self, name: &str) -> StoreResult<u64> {
        (**self).length(name)
    }

    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>> {
        (**self).fetch(name, start, end)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

impl<S: SequenceStore + ?Sized> SequenceStore for Box<S> {
    fn length(&self, name: &str) -> StoreResult<u64> {
        (**self).length(name)
    }

    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>> {
        (**self).fetch(name, start, end)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

impl<S: SequenceStore + ?Sized> SequenceStore for Arc<S> {
    fn length(&self, name: &str) -> StoreResult<u64> {
        (**self).length(name)
    }

    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>> {
        (**self).fetch(name, start, end)
    }

    fn names(&self) -> Vec<String> {
        (**self).names()
    }
}

pub(crate) fn check_bounds(name: &str, start: u64, end: u64, length: u64) -> StoreResult<()> {
    if start > end || end > length {
        return Err(StoreError::OutOfBounds {
            name: name.to_string(),
            start,
            end,
            length,
        });
    }
    Ok(())
}

/// Open a sequence file with the most suitable store.
///
/// Gzipped files are loaded into memory; anything else is memory-mapped and indexed.
pub fn open_store<P: AsRef<Path>>(path: P) -> StoreResult<Box<dyn SequenceStore + Send + Sync>> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".gz") {
        log::info!("Loading compressed sequences into memory: {}", path.display());
        Ok(Box::new(MemoryStore::from_fasta(path)?))
    } else {
        Ok(Box::new(IndexedFastaStore::open(path)?))
    }
}
