//! Memory-mapped FASTA with a samtools-style `.fai` index
//!
//! The index is read from `<fasta>.fai` when present and otherwise built by scanning the
//! file once with noodles. Lookups compute byte offsets from each record's line layout and
//! copy bases straight out of the mapping, skipping line terminators.

use memmap2::Mmap;
use noodles::fasta::{self, fai};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{check_bounds, SequenceStore, StoreError, StoreResult};

/// Byte offset of base `pos` in `record`.
pub fn byte_offset(record: &fai::Record, pos: u64) -> u64 {
    if record.line_bases() == 0 {
        return record.offset();
    }
    record.offset() + (pos / record.line_bases()) * record.line_width() + pos % record.line_bases()
}

/// Sequence name of an index record.
pub fn record_name(record: &fai::Record) -> String {
    String::from_utf8_lossy(record.name().as_ref()).into_owned()
}

fn index_records(index: &fai::Index) -> &[fai::Record] {
    index.as_ref()
}

/// `<fasta>.fai`
pub fn fai_path<P: AsRef<Path>>(fasta: P) -> PathBuf {
    let mut path = fasta.as_ref().as_os_str().to_owned();
    path.push(".fai");
    PathBuf::from(path)
}

/// Read a `.fai` file.
pub fn read_fai<P: AsRef<Path>>(path: P) -> StoreResult<fai::Index> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }
    let mut reader = fai::Reader::new(BufReader::new(File::open(path)?));
    reader
        .read_index()
        .map_err(|e| StoreError::InvalidIndex(format!("{}: {}", path.display(), e)))
}

/// Index `fasta` by scanning it.
pub fn build_fai<P: AsRef<Path>>(fasta: P) -> StoreResult<fai::Index> {
    let fasta = fasta.as_ref();
    fasta::io::index(fasta)
        .map_err(|e| StoreError::Parse(format!("failed to index {}: {}", fasta.display(), e)))
}

fn map_file(path: &Path) -> StoreResult<Mmap> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(StoreError::Parse(format!("FASTA file is empty: {}", path.display())));
    }
    // The mapping is read-only and the file is not expected to change while open.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap)
}

/// Build the index of `fasta` and write it next to it. Returns the `.fai` path.
pub fn write_fai<P: AsRef<Path>>(fasta: P, overwrite: bool) -> StoreResult<PathBuf> {
    let fasta = fasta.as_ref();
    if !fasta.exists() {
        return Err(StoreError::FileNotFound(fasta.to_path_buf()));
    }
    let output = fai_path(fasta);
    if output.exists() && !overwrite {
        return Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Index file {} already exists", output.display()),
        )));
    }

    let index = build_fai(fasta)?;
    let mut buffer = Vec::new();
    fai::Writer::new(&mut buffer).write_index(&index)?;
    std::fs::write(&output, buffer)?;

    log::info!(
        "Wrote index for {} sequences to {}",
        index_records(&index).len(),
        output.display()
    );
    Ok(output)
}

/// Random-access FASTA store backed by a memory map.
pub struct IndexedFastaStore {
    path: PathBuf,
    mmap: Mmap,
    index: fai::Index,
    by_name: HashMap<String, usize>,
}

impl IndexedFastaStore {
    /// Open `path`, using `<path>.fai` when it exists and indexing the file otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let fai = fai_path(path);
        if fai.exists() {
            return Self::open_with_index(path, &fai);
        }

        let mmap = map_file(path)?;
        log::debug!("No index found for {}, scanning file", path.display());
        let store = Self::from_parts(path, mmap, build_fai(path)?);
        log::info!("Opened {} ({} sequences)", path.display(), store.by_name.len());
        Ok(store)
    }

    pub fn open_with_index<P: AsRef<Path>, Q: AsRef<Path>>(path: P, fai: Q) -> StoreResult<Self> {
        let path = path.as_ref();
        let mmap = map_file(path)?;
        let store = Self::from_parts(path, mmap, read_fai(fai.as_ref())?);
        log::info!(
            "Opened {} with index {} ({} sequences)",
            path.display(),
            fai.as_ref().display(),
            store.by_name.len()
        );
        Ok(store)
    }

    fn from_parts(path: &Path, mmap: Mmap, index: fai::Index) -> Self {
        let by_name = index_records(&index)
            .iter()
            .enumerate()
            .map(|(i, r)| (record_name(r), i))
            .collect();
        Self {
            path: path.to_path_buf(),
            mmap,
            index,
            by_name,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> &fai::Index {
        &self.index
    }

    fn record(&self, name: &str) -> StoreResult<&fai::Record> {
        self.by_name
            .get(name)
            .and_then(|&i| index_records(&self.index).get(i))
            .ok_or_else(|| StoreError::SequenceNotFound(name.to_string()))
    }
}

impl SequenceStore for IndexedFastaStore {
    fn length(&self, name: &str) -> StoreResult<u64> {
        Ok(self.record(name)?.length())
    }

    fn fetch(&self, name: &str, start: u64, end: u64) -> StoreResult<Vec<u8>> {
        let record = self.record(name)?;
        check_bounds(name, start, end, record.length())?;
        let line_bases = record.line_bases();
        if line_bases == 0 && end > start {
            return Err(StoreError::InvalidIndex(format!(
                "record '{}' has no line layout",
                name
            )));
        }

        let mut sequence = Vec::with_capacity((end - start) as usize);
        let mut pos = start;
        while pos < end {
            let in_line = pos % line_bases;
            let take = (line_bases - in_line).min(end - pos);
            let from = byte_offset(record, pos) as usize;
            let bytes = self.mmap.get(from..from + take as usize).ok_or_else(|| {
                StoreError::InvalidIndex(format!(
                    "record '{}' points past the end of {}",
                    name,
                    self.path.display()
                ))
            })?;
            sequence.extend_from_slice(bytes);
            pos += take;
        }

        Ok(sequence)
    }

    fn names(&self) -> Vec<String> {
        index_records(&self.index).iter().map(record_name).collect()
    }
}
