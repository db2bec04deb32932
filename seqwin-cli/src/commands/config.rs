//! Config command implementation - print or write an example seqwin.toml

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;

pub fn execute(example: bool, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            Config::example().save_to_file(&path)?;
            log::info!("Example configuration written to: {}", path.display());
        }
        None if example => print!("{}", Config::example_toml()?),
        None => {
            return Err(CliError::config("Nothing to do: pass --example or --out <path>").into())
        }
    }

    Ok(())
}
