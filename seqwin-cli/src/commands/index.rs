//! Index command implementation - write a .fai next to a FASTA file

use anyhow::{Context, Result};
use std::path::PathBuf;

use seqwin_core::store::{fai_path, write_fai};

use super::require_file;
use crate::error::CliError;

pub fn execute(fasta: PathBuf, force: bool) -> Result<()> {
    require_file(&fasta)?;

    let existing = fai_path(&fasta);
    if existing.exists() && !force {
        return Err(CliError::config(format!(
            "Index already exists: {} (use --force to overwrite)",
            existing.display()
        ))
        .into());
    }

    let fai = write_fai(&fasta, force)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to index {}", fasta.display()))?;
    log::info!("Index written to: {}", fai.display());

    Ok(())
}
