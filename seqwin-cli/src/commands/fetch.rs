//! Fetch command implementation - resolve one region to an encoded window

use anyhow::{Context, Result};
use std::path::PathBuf;

use seqwin_core::{FastaInterval, Interval};

use super::{open_sequence_store, WindowOutput};
use crate::config::Config;
use crate::error::CliError;

pub fn execute(config: &Config, fasta: PathBuf, region: String) -> Result<()> {
    let interval: Interval = region
        .parse()
        .map_err(|e: seqwin_core::RegionError| CliError::invalid_region(e.to_string()))?;
    log::info!("Resolving {} from {}", interval, fasta.display());

    let store = open_sequence_store(&fasta)?;
    let resolver = FastaInterval::new(store, config.dataset.policy())
        .map_err(|e| CliError::config(e.to_string()))?;
    let mut rng = config.rng();

    let resolved = resolver
        .resolve(
            &mut rng,
            &interval.name,
            interval.start,
            interval.end,
            config.dataset.return_augs,
        )
        .map_err(CliError::from)?;

    let output = WindowOutput::new(&interval, resolved);
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize window")?
    );

    Ok(())
}
