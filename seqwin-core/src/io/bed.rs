//! BED-like interval table reader
//!
//! Tab-separated, no header row. The first three columns are `name`, `start`, `end`
//! (0-based, half-open). Further columns are kept as opaque [`FieldValue`]s whose type
//! is inferred per cell (integer, then float, then string; `.` or empty is null) unless
//! a schema override pins the column type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{FieldValue, GenomicPos, IntervalRecord};

#[derive(Debug, Error)]
pub enum BedError {
    #[error("Line {line}: expected at least 3 fields, got {got}")]
    InsufficientFields { line: usize, got: usize },

    #[error("Line {line}: invalid coordinate '{value}'")]
    InvalidCoordinate { line: usize, value: String },

    #[error("Line {line}, column {column}: cannot read '{value}' as {expected:?}")]
    InvalidField {
        line: usize,
        column: usize,
        value: String,
        expected: ColumnType,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Forced type of an extra column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int,
    Float,
    Str,
}

/// Column types keyed by 0-based column index. Only columns 3 and above are affected.
pub type SchemaOverrides = HashMap<usize, ColumnType>;

#[derive(Debug, Clone, Default)]
pub struct BedReader {
    overrides: SchemaOverrides,
}

impl BedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_overrides(mut self, overrides: SchemaOverrides) -> Self {
        for column in overrides.keys().filter(|&&c| c < 3) {
            log::warn!(
                "Ignoring schema override for column {}: name/start/end types are fixed",
                column
            );
        }
        self.overrides = overrides.into_iter().filter(|(c, _)| *c >= 3).collect();
        self
    }

    /// Parse one data line. `line_num` is 1-based and only used in errors.
    pub fn parse_line(&self, line: &str, line_num: usize) -> Result<IntervalRecord, BedError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();

        if fields.len() < 3 {
            return Err(BedError::InsufficientFields {
                line: line_num,
                got: fields.len(),
            });
        }

        let coordinate = |value: &str| -> Result<GenomicPos, BedError> {
            value
                .trim()
                .parse::<GenomicPos>()
                .map_err(|_| BedError::InvalidCoordinate {
                    line: line_num,
                    value: value.to_string(),
                })
        };

        let start = coordinate(fields[1])?;
        let end = coordinate(fields[2])?;

        let extra = fields
            .iter()
            .enumerate()
            .skip(3)
            .map(|(column, value)| self.parse_field(value, column, line_num))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IntervalRecord::new(fields[0], start, end).with_extra(extra))
    }

    fn parse_field(&self, value: &str, column: usize, line_num: usize) -> Result<FieldValue, BedError> {
        let invalid = |expected: ColumnType| BedError::InvalidField {
            line: line_num,
            column,
            value: value.to_string(),
            expected,
        };

        match self.overrides.get(&column) {
            Some(ColumnType::Str) => Ok(FieldValue::Str(value.to_string())),
            Some(ColumnType::Int) if is_null(value) => Ok(FieldValue::Null),
            Some(ColumnType::Int) => value
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| invalid(ColumnType::Int)),
            Some(ColumnType::Float) if is_null(value) => Ok(FieldValue::Null),
            Some(ColumnType::Float) => value
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| invalid(ColumnType::Float)),
            None => Ok(infer_field(value)),
        }
    }

    /// Read every record from a buffered source.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<Vec<IntervalRecord>, BedError> {
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if is_skippable(&line) {
                continue;
            }
            records.push(self.parse_line(&line, line_num + 1)?);
        }

        Ok(records)
    }

    /// Read a BED file; `.gz` is decompressed transparently.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<IntervalRecord>, BedError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BedError::FileNotFound(path.to_path_buf()));
        }

        let records = self.read(super::open_text(path)?)?;
        log::info!("Read {} intervals from {}", records.len(), path.display());
        Ok(records)
    }
}

fn is_null(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == "."
}

fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return true;
    }
    let keyword = trimmed.split(['\t', ' ']).next().unwrap_or_default();
    keyword == "track" || keyword == "browser"
}

fn infer_field(value: &str) -> FieldValue {
    if is_null(value) {
        return FieldValue::Null;
    }
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        FieldValue::Int(v)
    } else if let Ok(v) = trimmed.parse::<f64>() {
        FieldValue::Float(v)
    } else {
        FieldValue::Str(value.to_string())
    }
}
