//! SeqWin Core Library
//!
//! Fixed-size genomic windows for model training: sequence stores, interval tables,
//! shift and reverse-complement augmentation, and index or one-hot encoding.

pub mod types;
pub mod codec;
pub mod augment;
pub mod store;
pub mod io;
pub mod interval;
pub mod catalog;

// Re-export commonly used types and functions
pub use types::{FieldValue, GenomicPos, Interval, IntervalRecord, RegionError};
pub use codec::{EncodedSequence, EncodingMode};
pub use augment::Augmentation;
pub use store::{open_store, IndexedFastaStore, MemoryStore, SequenceStore, StoreError};
pub use io::{BedError, BedReader, ColumnType, SchemaOverrides};
pub use interval::{ConfigError, EncodingPolicy, FastaInterval, ResolvedSequence, ResolverError};
pub use catalog::{DatasetBuilder, DatasetError, GenomeIntervalDataset};

/// Version information for the SeqWin core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
