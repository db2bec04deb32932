//! Validate command implementation - count intervals kept by the dataset filter

use anyhow::{Context, Result};
use serde::Serialize;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use seqwin_core::DatasetBuilder;

use super::{open_sequence_store, require_file};
use crate::config::Config;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ValidationReport {
    original: usize,
    kept: usize,
    dropped: usize,
    context_length: Option<u64>,
}

pub fn execute(config: &Config, fasta: PathBuf, bed: PathBuf) -> Result<()> {
    require_file(&bed)?;
    let store = open_sequence_store(&fasta)?;

    if config.dataset.context_length.is_none() {
        log::warn!("No context length configured; intervals are not validated");
    }

    let original = Rc::new(Cell::new(0));
    let counter = Rc::clone(&original);

    let dataset = DatasetBuilder::new()
        .bed_file(&bed)
        .schema_overrides(config.dataset.schema_overrides()?)
        .filter(move |records| {
            counter.set(records.len());
            records
        })
        .name_map(config.dataset.name_map())
        .policy(config.dataset.policy())
        .build(store)
        .map_err(CliError::from)?;

    let report = ValidationReport {
        original: original.get(),
        kept: dataset.len(),
        dropped: original.get() - dataset.len(),
        context_length: config.dataset.context_length,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    Ok(())
}
