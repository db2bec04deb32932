//! Sample command implementation - build a dataset and emit windows as JSON lines

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use seqwin_core::DatasetBuilder;

use super::{open_sequence_store, require_file, WindowOutput};
use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    fasta: PathBuf,
    bed: PathBuf,
    count: Option<usize>,
    out: Option<PathBuf>,
) -> Result<()> {
    require_file(&bed)?;
    let store = open_sequence_store(&fasta)?;

    let dataset = DatasetBuilder::new()
        .bed_file(&bed)
        .schema_overrides(config.dataset.schema_overrides()?)
        .name_map(config.dataset.name_map())
        .policy(config.dataset.policy())
        .sample_in_frame(config.dataset.sample_in_frame)
        .return_augs(config.dataset.return_augs)
        .build(store)
        .map_err(CliError::from)?;

    let total = count.map_or(dataset.len(), |n| n.min(dataset.len()));
    log::info!("Emitting {} of {} windows", total, dataset.len());

    let mut writer: Box<dyn Write> = match &out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut rng = config.rng();
    for index in 0..total {
        let window = dataset.window(index, &mut rng).map_err(CliError::from)?;
        let resolved = dataset
            .resolve_window(&window, &mut rng)
            .map_err(CliError::from)?;

        serde_json::to_writer(&mut writer, &WindowOutput::new(&window, resolved))
            .context("Failed to serialize window")?;
        writeln!(writer)?;
    }
    writer.flush()?;

    if let Some(path) = out {
        log::info!("Windows written to: {}", path.display());
    }

    Ok(())
}
