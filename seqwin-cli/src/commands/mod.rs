pub mod fetch;
pub mod sample;
pub mod validate;
pub mod index;
pub mod config;

use serde::Serialize;
use std::path::Path;

use seqwin_core::codec::decode_indices;
use seqwin_core::{open_store, EncodedSequence, Interval, ResolvedSequence, SequenceStore};

use crate::error::{CliError, CliResult};

pub type DynStore = Box<dyn SequenceStore + Send + Sync>;

pub fn require_file(path: &Path) -> CliResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::file_not_found(path.to_path_buf()))
    }
}

/// Indexed access for plain FASTA, in-memory for gzipped input
pub fn open_sequence_store(path: &Path) -> CliResult<DynStore> {
    require_file(path)?;
    Ok(open_store(path)?)
}

/// One resolved window as printed by `fetch` and `sample`
#[derive(Debug, Serialize)]
pub struct WindowOutput {
    pub name: String,
    pub start: i64,
    pub end: i64,
    pub shape: [usize; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<bool>,
    /// Index encoding rendered as ACGTN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_hot: Option<Vec<[f32; 4]>>,
}

impl WindowOutput {
    pub fn new(window: &Interval, resolved: ResolvedSequence) -> Self {
        let shape = resolved.encoded.shape();
        let (encoded, augmentation) = resolved.into_parts();
        let (sequence, one_hot) = match encoded {
            EncodedSequence::Indices(indices) => (Some(decode_indices(&indices)), None),
            EncodedSequence::OneHot(vectors) => (None, Some(vectors)),
        };

        Self {
            name: window.name.clone(),
            start: window.start,
            end: window.end,
            shape,
            shift: augmentation.map(|a| a.shift),
            rc: augmentation.map(|a| a.reverse_complemented),
            sequence,
            one_hot,
        }
    }
}
