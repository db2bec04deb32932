use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};
use seqwin_core::EncodingMode;

#[derive(Parser)]
#[command(name = "seqwin")]
#[command(about = "SeqWin - genomic windows for sequence models")]
#[command(version)]
#[command(long_about = "
SeqWin resolves genomic intervals into fixed-size encoded windows, with optional
coordinate shift and reverse-complement augmentation.

Examples:
  seqwin index --fasta genome.fa
  seqwin fetch --fasta genome.fa --region chr1:10000-10100 --context-length 128
  seqwin sample --fasta genome.fa --bed peaks.bed --context-length 1024 -n 10 --seed 7
  seqwin validate --fasta genome.fa --bed peaks.bed --context-length 1024
  seqwin config --example > seqwin.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for shift, reverse-complement and in-frame sampling draws
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a single region and print it as JSON
    Fetch {
        /// Reference sequence file (FASTA, optionally gzipped)
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// Region as name:start-end (0-based, half-open)
        #[arg(short, long, required = true)]
        region: String,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Build a dataset from a BED file and print windows as JSON lines
    Sample {
        /// Reference sequence file (FASTA, optionally gzipped)
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// Interval table (BED-like, optionally gzipped)
        #[arg(long, required = true)]
        bed: PathBuf,

        /// Number of rows to emit (default: all)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Sample a context-length window inside each longer interval
        #[arg(long)]
        sample_in_frame: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Report how many intervals survive validation
    Validate {
        /// Reference sequence file (FASTA, optionally gzipped)
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// Interval table (BED-like, optionally gzipped)
        #[arg(long, required = true)]
        bed: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Write a .fai index next to a FASTA file
    Index {
        /// Reference sequence file (uncompressed FASTA)
        #[arg(long, required = true)]
        fasta: PathBuf,

        /// Overwrite an existing index
        #[arg(long)]
        force: bool,
    },

    /// Print or write an example configuration file
    Config {
        /// Print example configuration to stdout
        #[arg(long)]
        example: bool,

        /// Write example configuration to this path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Window options shared by the resolving commands. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Output window length
    #[arg(long)]
    pub context_length: Option<u64>,

    /// Smallest coordinate shift (use with --max-shift)
    #[arg(long, allow_negative_numbers = true)]
    pub min_shift: Option<i64>,

    /// Largest coordinate shift (use with --min-shift)
    #[arg(long, allow_negative_numbers = true)]
    pub max_shift: Option<i64>,

    /// Reverse complement half of the windows at random
    #[arg(long)]
    pub rc: bool,

    /// Output encoding
    #[arg(long)]
    pub encoding: Option<EncodingArg>,

    /// Include the applied shift and orientation in the output
    #[arg(long)]
    pub augs: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum EncodingArg {
    Index,
    OneHot,
}

impl From<EncodingArg> for EncodingMode {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Index => EncodingMode::Index,
            EncodingArg::OneHot => EncodingMode::OneHot,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.general.seed = Some(seed);
    }

    // Execute the requested command
    match cli.command {
        Commands::Fetch {
            fasta,
            region,
            policy,
        } => {
            config.dataset.apply_overrides(&policy)?;
            commands::fetch::execute(&config, fasta, region)?;
        }

        Commands::Sample {
            fasta,
            bed,
            count,
            out,
            sample_in_frame,
            policy,
        } => {
            config.dataset.apply_overrides(&policy)?;
            if sample_in_frame {
                config.dataset.sample_in_frame = true;
            }
            commands::sample::execute(&config, fasta, bed, count, out)?;
        }

        Commands::Validate { fasta, bed, policy } => {
            config.dataset.apply_overrides(&policy)?;
            commands::validate::execute(&config, fasta, bed)?;
        }

        Commands::Index { fasta, force } => {
            commands::index::execute(fasta, force)?;
        }

        Commands::Config { example, out } => {
            commands::config::execute(example, out)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        if let Some(cli_error) = e.downcast_ref::<CliError>() {
            print_error_and_exit(cli_error);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
