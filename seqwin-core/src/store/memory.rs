//! In-memory sequence store
//!
//! Loads every record of a FASTA/FASTQ file (optionally gzipped) using needletail.
//! Suitable for small references, compressed inputs, and tests.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use needletail::{parse_fastx_file, parse_fastx_reader};

use super::{check_bounds, SequenceStore, StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sequences: HashMap<String, Vec<u8>>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, bases)` pairs. Later duplicates replace earlier ones.
    pub fn from_records<N, I>(records: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<u8>)>,
    {
        let mut store = Self::new();
        for (name, sequence) in records {
            store.insert(name, sequence);
        }
        store
    }

    /// Parse a FASTA/FASTQ file; gzip is detected automatically.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = parse_fastx_file(path).map_err(|e| StoreError::Parse(e.to_string()))?;
        let mut store = Self::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| StoreError::Parse(e.to_string()))?;
            store.insert(record_name(record.id()), record.seq().to_vec());
        }

        log::info!(
            "Loaded {} sequences ({} bp) from {}",
            store.order.len(),
            store.total_length(),
            path.display()
        );
        Ok(store)
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn from_reader<R: Read + Send>(reader: R) -> StoreResult<Self> {
        let mut fastx_reader =
            parse_fastx_reader(reader).map_err(|e| StoreError::Parse(e.to_string()))?;
        let mut store = Self::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| StoreError::Parse(e.to_string()))?;
            store.insert(record_name(record.id()), record.seq().to_vec());
        }
        Ok(store)
    }

    pub fn insert<N: Into<String>>(&mut self, name: N, sequence: Vec<u8>) {
        let name = name.into();
        if self.sequences.insert(name.clone(), sequence).is_none() {
            self.order.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total_length(&self) -> u64 {
        self.sequences.values().map(|s| s.len() as u64).sum()
    }
}

/// Sequence name is the header up to the first whitespace.
fn record_name(id: &[u8]) -> String {
    let header = String::from_utf8_lossy(id);
    header
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

impl SequenceStore for MemoryStore {
    fn length(&self, name: &str) -> StoreResult<u64> {
        self.sequences
            .get(name)
            .map(|s| s.len() as u64)
            .ok_or_else(|| StoreError::SequenceNotFound(name.to_string()))
    }

    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>> {
        let sequence = self
            .sequences
            .get(name)
            .ok_or_else(|| StoreError::SequenceNotFound(name.to_string()))?;
        check_bounds(name, start, end, sequence.len() as u64)?;
        Ok(sequence[start as usize..end as usize].to_vec())
    }

    fn names(&self) -> Vec<String> {
        self.order.clone()
    }
}
