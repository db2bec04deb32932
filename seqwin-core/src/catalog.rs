//! Interval catalog
//!
//! [`GenomeIntervalDataset`] owns a filtered table of intervals and a resolver, and turns
//! row indices into encoded windows. When a context length is configured, rows that cannot
//! produce a full window are dropped once at construction.

use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::interval::{ConfigError, EncodingPolicy, FastaInterval, ResolvedSequence};
use crate::io::{BedError, BedReader, SchemaOverrides};
use crate::store::{IndexedFastaStore, SequenceStore, StoreError};
use crate::types::{GenomicPos, Interval, IntervalRecord};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sequence store error: {0}")]
    Store(#[from] StoreError),

    #[error("Interval table error: {0}")]
    Bed(#[from] BedError),

    #[error("Row {index} out of bounds for dataset of {len} rows")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No interval source given; call bed_file() or records()")]
    MissingSource,
}

pub type DatasetResult<T> = Result<T, DatasetError>;

type RecordFilter = Box<dyn FnOnce(Vec<IntervalRecord>) -> Vec<IntervalRecord>>;

enum Source {
    BedFile(PathBuf),
    Records(Vec<IntervalRecord>),
}

/// Builder for [`GenomeIntervalDataset`]
#[derive(Default)]
pub struct DatasetBuilder {
    source: Option<Source>,
    schema_overrides: SchemaOverrides,
    filter: Option<RecordFilter>,
    name_map: HashMap<String, String>,
    policy: EncodingPolicy,
    sample_in_frame: bool,
    return_augs: bool,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read intervals from a BED-like file
    pub fn bed_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(Source::BedFile(path.as_ref().to_path_buf()));
        self
    }

    /// Use an in-memory interval table
    pub fn records(mut self, records: Vec<IntervalRecord>) -> Self {
        self.source = Some(Source::Records(records));
        self
    }

    pub fn schema_overrides(mut self, overrides: SchemaOverrides) -> Self {
        self.schema_overrides = overrides;
        self
    }

    /// Transform the table after loading and before validation.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: FnOnce(Vec<IntervalRecord>) -> Vec<IntervalRecord> + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Interval name -> store name. Names without an entry are used as-is.
    pub fn name_map(mut self, name_map: HashMap<String, String>) -> Self {
        self.name_map = name_map;
        self
    }

    pub fn policy(mut self, policy: EncodingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn sample_in_frame(mut self, enabled: bool) -> Self {
        self.sample_in_frame = enabled;
        self
    }

    pub fn return_augs(mut self, enabled: bool) -> Self {
        self.return_augs = enabled;
        self
    }

    /// Open `fasta_path` as an indexed store and build against it.
    pub fn open<P: AsRef<Path>>(
        self,
        fasta_path: P,
    ) -> DatasetResult<GenomeIntervalDataset<IndexedFastaStore>> {
        self.policy.validate()?;
        let store = IndexedFastaStore::open(fasta_path)?;
        self.build(store)
    }

    pub fn build<S: SequenceStore>(self, store: S) -> DatasetResult<GenomeIntervalDataset<S>> {
        if self.sample_in_frame && self.policy.context_length.is_none() {
            return Err(ConfigError::SampleInFrameWithoutContext.into());
        }

        let records = match self.source {
            Some(Source::BedFile(path)) => {
                if !path.exists() {
                    return Err(ConfigError::MissingFile(path).into());
                }
                BedReader::new()
                    .with_schema_overrides(self.schema_overrides)
                    .read_file(&path)?
            }
            Some(Source::Records(records)) => records,
            None => return Err(DatasetError::MissingSource),
        };

        let records = match self.filter {
            Some(filter) => filter(records),
            None => records,
        };

        let resolver = FastaInterval::new(store, self.policy)?;
        let mut dataset = GenomeIntervalDataset {
            records,
            resolver,
            name_map: self.name_map,
            sample_in_frame: self.sample_in_frame,
            return_augs: self.return_augs,
        };

        if let Some(context_length) = dataset.resolver.context_length() {
            dataset.retain_valid(context_length);
        }

        Ok(dataset)
    }
}

/// Index-addressable collection of intervals resolved to encoded windows
pub struct GenomeIntervalDataset<S> {
    records: Vec<IntervalRecord>,
    resolver: FastaInterval<S>,
    name_map: HashMap<String, String>,
    sample_in_frame: bool,
    return_augs: bool,
}

impl<S: SequenceStore> GenomeIntervalDataset<S> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&IntervalRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[IntervalRecord] {
        &self.records
    }

    pub fn resolver(&self) -> &FastaInterval<S> {
        &self.resolver
    }

    pub fn return_augs(&self) -> bool {
        self.return_augs
    }

    pub fn sample_in_frame(&self) -> bool {
        self.sample_in_frame
    }

    /// Store-side name for an interval name
    pub fn store_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.name_map.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Window coordinates for row `index`: remapped name, and an in-frame sample when enabled.
    pub fn window<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> DatasetResult<Interval> {
        let record = self.row(index).ok_or(DatasetError::IndexOutOfBounds {
            index,
            len: self.len(),
        })?;

        let name = self.store_name(&record.name).to_string();
        let mut start = record.start;
        let mut end = record.end;

        if self.sample_in_frame {
            if let Some(context_length) = self.resolver.context_length() {
                if end - start > context_length {
                    start = rng.gen_range(start..=end - context_length);
                    end = start + context_length;
                }
            }
        }

        Ok(Interval::new(name, start, end))
    }

    /// Resolve an already sampled window with this dataset's settings.
    pub fn resolve_window<R: Rng + ?Sized>(
        &self,
        window: &Interval,
        rng: &mut R,
    ) -> DatasetResult<ResolvedSequence> {
        Ok(self.resolver.resolve(
            rng,
            &window.name,
            window.start,
            window.end,
            self.return_augs,
        )?)
    }

    pub fn get<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> DatasetResult<ResolvedSequence> {
        let window = self.window(index, rng)?;
        self.resolve_window(&window, rng)
    }

    /// Resolve every row in order.
    pub fn iter<'a, R: Rng + ?Sized>(
        &'a self,
        rng: &'a mut R,
    ) -> impl Iterator<Item = DatasetResult<ResolvedSequence>> + 'a {
        (0..self.len()).map(move |index| self.get(index, &mut *rng))
    }

    fn retain_valid(&mut self, context_length: GenomicPos) {
        let original = self.records.len();
        let store = self.resolver.store();
        let name_map = &self.name_map;
        let mut unknown = 0usize;

        self.records.retain(|record| {
            let name = name_map
                .get(&record.name)
                .map(String::as_str)
                .unwrap_or(&record.name);
            match store.length(name) {
                Ok(length) => is_valid_interval(record, length as GenomicPos, context_length),
                Err(e) => {
                    log::debug!("Dropping {}: {}", record.interval(), e);
                    unknown += 1;
                    false
                }
            }
        });

        if unknown > 0 {
            log::warn!("{} intervals refer to sequences missing from the store", unknown);
        }
        log::info!(
            "Original dataset size: {}, now: {}",
            original,
            self.records.len()
        );
    }
}

/// A row can produce a full window: non-empty, starts after position 0, and both the
/// interval and the context fit on the sequence.
fn is_valid_interval(record: &IntervalRecord, length: GenomicPos, context_length: GenomicPos) -> bool {
    let interval_length = record.end - record.start;
    interval_length <= length
        && context_length <= length
        && record.start < record.end
        && record.start > 0
}
