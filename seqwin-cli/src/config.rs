//! Configuration handling for the SeqWin CLI
//!
//! Supports loading configuration from seqwin.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use seqwin_core::{ColumnType, EncodingMode, EncodingPolicy, SchemaOverrides};

use crate::error::CliError;
use crate::PolicyArgs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seed for all random draws; a fresh seed is drawn and logged when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Output window length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,

    /// Inclusive [min, max] coordinate shift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_range: Option<[i64; 2]>,

    /// Reverse complement half of the windows at random
    #[serde(default)]
    pub reverse_complement: bool,

    /// "index" or "one_hot"
    #[serde(default = "default_encoding")]
    pub encoding: EncodingMode,

    /// Sample a context-length window inside longer intervals
    #[serde(default)]
    pub sample_in_frame: bool,

    /// Report the applied shift and orientation with each window
    #[serde(default)]
    pub return_augs: bool,

    /// Interval-table name -> FASTA name
    #[serde(default)]
    pub name_map: BTreeMap<String, String>,

    /// Column index (0-based, 3 and above) -> "int", "float" or "str"
    #[serde(default)]
    pub schema_overrides: BTreeMap<String, ColumnType>,
}

// Default value functions
fn default_encoding() -> EncodingMode { EncodingMode::OneHot }

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            context_length: None,
            shift_range: None,
            reverse_complement: false,
            encoding: default_encoding(),
            sample_in_frame: false,
            return_augs: false,
            name_map: BTreeMap::new(),
            schema_overrides: BTreeMap::new(),
        }
    }
}

impl DatasetConfig {
    /// Layer command-line flags over the file values.
    pub fn apply_overrides(&mut self, args: &PolicyArgs) -> Result<(), CliError> {
        if let Some(context_length) = args.context_length {
            self.context_length = Some(context_length);
        }
        match (args.min_shift, args.max_shift) {
            (Some(min), Some(max)) => self.shift_range = Some([min, max]),
            (None, None) => {}
            _ => {
                return Err(CliError::config(
                    "--min-shift and --max-shift must be given together",
                ))
            }
        }
        if args.rc {
            self.reverse_complement = true;
        }
        if let Some(encoding) = args.encoding {
            self.encoding = encoding.into();
        }
        if args.augs {
            self.return_augs = true;
        }
        Ok(())
    }

    pub fn policy(&self) -> EncodingPolicy {
        EncodingPolicy {
            context_length: self.context_length,
            shift_range: self.shift_range.map(|[min, max]| (min, max)),
            reverse_complement: self.reverse_complement,
            encoding: self.encoding,
        }
    }

    pub fn name_map(&self) -> HashMap<String, String> {
        self.name_map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn schema_overrides(&self) -> Result<SchemaOverrides, CliError> {
        self.schema_overrides
            .iter()
            .map(|(column, column_type)| {
                column
                    .parse::<usize>()
                    .map(|c| (c, *column_type))
                    .map_err(|_| {
                        CliError::config(format!(
                            "schema_overrides key '{}' is not a column index",
                            column
                        ))
                    })
            })
            .collect()
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::file_not_found(path.to_path_buf()).into());
                }
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find seqwin.toml in current directory
                let default_path = PathBuf::from("seqwin.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seqwin.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// A filled-in configuration showing every option
    pub fn example() -> Self {
        let mut dataset = DatasetConfig {
            context_length: Some(1024),
            shift_range: Some([-2, 2]),
            reverse_complement: true,
            return_augs: true,
            ..DatasetConfig::default()
        };
        dataset.name_map.insert("1".to_string(), "chr1".to_string());
        dataset.schema_overrides.insert("3".to_string(), ColumnType::Str);

        Self {
            general: GeneralConfig { seed: Some(42) },
            dataset,
        }
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::example()).context("Failed to serialize example configuration")
    }

    /// Seeded generator for this run
    pub fn rng(&self) -> StdRng {
        let seed = self.general.seed.unwrap_or_else(rand::random);
        log::info!("Random seed: {}", seed);
        StdRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodingArg;
    use rand::Rng;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.seed, None);
        assert_eq!(config.dataset.encoding, EncodingMode::OneHot);
        assert!(!config.dataset.sample_in_frame);
        assert_eq!(config.dataset.policy(), EncodingPolicy::default());
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let config = Config::example();
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.general.seed, Some(42));
        assert_eq!(loaded_config.dataset.policy(), config.dataset.policy());
        assert_eq!(loaded_config.dataset.name_map, config.dataset.name_map);
        assert_eq!(loaded_config.dataset.schema_overrides()?.get(&3), Some(&ColumnType::Str));

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let config: Config = toml::from_str("[dataset]\ncontext_length = 200\nencoding = \"index\"\n")?;
        assert_eq!(config.dataset.context_length, Some(200));
        assert_eq!(config.dataset.encoding, EncodingMode::Index);
        assert!(config.dataset.name_map.is_empty());
        assert_eq!(config.general.seed, None);
        Ok(())
    }

    #[test]
    fn test_example_toml_generation() -> Result<()> {
        let example = Config::example_toml()?;
        assert!(example.contains("[general]"));
        assert!(example.contains("[dataset]"));
        assert!(example.contains("context_length = 1024"));
        Ok(())
    }

    #[test]
    fn test_cli_overrides() {
        let mut dataset = DatasetConfig::default();
        let args = PolicyArgs {
            context_length: Some(64),
            min_shift: Some(-3),
            max_shift: Some(3),
            rc: true,
            encoding: Some(EncodingArg::Index),
            augs: true,
        };
        dataset.apply_overrides(&args).unwrap();

        let policy = dataset.policy();
        assert_eq!(policy.context_length, Some(64));
        assert_eq!(policy.shift_range, Some((-3, 3)));
        assert!(policy.reverse_complement);
        assert_eq!(policy.encoding, EncodingMode::Index);
        assert!(dataset.return_augs);

        let half = PolicyArgs {
            min_shift: Some(-1),
            ..PolicyArgs::default()
        };
        assert!(matches!(
            dataset.apply_overrides(&half),
            Err(CliError::Config { .. })
        ));
    }

    #[test]
    fn test_bad_schema_override_key() {
        let mut dataset = DatasetConfig::default();
        dataset.schema_overrides.insert("score".to_string(), ColumnType::Float);
        assert!(dataset.schema_overrides().is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = Config {
            general: GeneralConfig { seed: Some(9) },
            ..Config::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
