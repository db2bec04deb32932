//! Error handling for the SeqWin CLI

use thiserror::Error;
use std::path::PathBuf;

use seqwin_core::{BedError, ConfigError, DatasetError, StoreError};

/// Errors that get a tailored message and suggestions when they reach `main`
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Sequence not found: {name}")]
    SequenceNotFound { name: String },

    #[error("Invalid region: {message}")]
    InvalidRegion { message: String },

    #[error("Index error: {message}")]
    Index { message: String },

    #[error("Interval table error: {message}")]
    IntervalTable { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_region<S: Into<String>>(message: S) -> Self {
        Self::InvalidRegion { message: message.into() }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FileNotFound(path) => Self::FileNotFound { path },
            StoreError::SequenceNotFound(name) => Self::SequenceNotFound { name },
            StoreError::InvalidIndex(message) => Self::Index { message },
            err @ StoreError::WindowTooLarge { .. } => Self::invalid_region(err.to_string()),
            other => Self::Index { message: other.to_string() },
        }
    }
}

impl From<DatasetError> for CliError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::Store(e) => e.into(),
            DatasetError::Config(ConfigError::MissingFile(path)) => Self::FileNotFound { path },
            DatasetError::Config(e) => Self::config(e.to_string()),
            DatasetError::Bed(BedError::FileNotFound(path)) => Self::FileNotFound { path },
            DatasetError::Bed(e) => Self::IntervalTable { message: e.to_string() },
            other => Self::config(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    // Add helpful suggestions based on error type
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::SequenceNotFound { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Sequence names are the FASTA header up to the first space\n\
                 • Map interval names to FASTA names with [dataset.name_map] in seqwin.toml"
            );
        }

        CliError::Index { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Rebuild the index with 'seqwin index --fasta <file> --force'\n\
                 • Indexed access needs uncompressed FASTA with fixed-width lines"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your seqwin.toml configuration file\n\
                 • Use 'seqwin config --example' to generate a sample configuration"
            );
        }

        CliError::InvalidRegion { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Regions are written name:start-end, e.g. chr1:1000-2000\n\
                 • Padding past the sequence ends is limited to about a billion bases"
            );
        }

        CliError::IntervalTable { .. } => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("test.fa"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: CliError = StoreError::SequenceNotFound("chrZ".to_string()).into();
        assert!(matches!(err, CliError::SequenceNotFound { ref name } if name == "chrZ"));
        assert!(format_error_with_suggestions(&err).contains("name_map"));
    }

    #[test]
    fn test_oversized_window_is_a_region_error() {
        let err: CliError = StoreError::WindowTooLarge {
            name: "chr1".to_string(),
            start: -4_611_686_018_427_387_904,
            end: 5,
        }
        .into();
        assert!(matches!(err, CliError::InvalidRegion { .. }));
        assert!(format_error_with_suggestions(&err).contains("name:start-end"));
    }

    #[test]
    fn test_dataset_error_conversion() {
        let err: CliError =
            DatasetError::Config(ConfigError::MissingFile(PathBuf::from("peaks.bed"))).into();
        assert!(matches!(err, CliError::FileNotFound { .. }));

        let err: CliError = DatasetError::Config(ConfigError::SampleInFrameWithoutContext).into();
        assert!(matches!(err, CliError::Config { .. }));

        let err: CliError = DatasetError::Config(ConfigError::ContextLengthTooLarge {
            context_length: u64::MAX,
            limit: 1 << 40,
        })
        .into();
        assert!(matches!(err, CliError::Config { ref message } if message.contains("exceeds")));
    }
}
