//! Shared coordinate, region and interval-table value types

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Signed genomic coordinate. Requested windows may reach past either end of a sequence.
pub type GenomicPos = i64;

/// Half-open interval `[start, end)` on a named sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub name: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Interval {
    pub fn new<S: Into<String>>(name: S, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> GenomicPos {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.name, self.start, self.end)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("Invalid region string: {0} (expected name:start-end)")]
    Invalid(String),
    #[error("Invalid coordinate in region {region}: {value}")]
    InvalidCoordinate { region: String, value: String },
}

fn region_regex() -> &'static Regex {
    static REGION: OnceLock<Regex> = OnceLock::new();
    REGION.get_or_init(|| {
        // Greedy name so that names containing ':' still parse.
        Regex::new(r"^(.+):(-?[0-9,_]+)-(-?[0-9,_]+)$").expect("region regex is valid")
    })
}

fn parse_coordinate(region: &str, value: &str) -> Result<GenomicPos, RegionError> {
    let cleaned: String = value.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .parse::<GenomicPos>()
        .map_err(|_| RegionError::InvalidCoordinate {
            region: region.to_string(),
            value: value.to_string(),
        })
}

/// Parses `name:start-end` with 0-based, half-open coordinates.
impl FromStr for Interval {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = region_regex()
            .captures(s)
            .ok_or_else(|| RegionError::Invalid(s.to_string()))?;

        let start = parse_coordinate(s, &caps[2])?;
        let end = parse_coordinate(s, &caps[3])?;
        Ok(Interval::new(&caps[1], start, end))
    }
}

/// An opaque value from an interval-table column past the first three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Str(v) => write!(f, "{}", v),
            FieldValue::Null => write!(f, "."),
        }
    }
}

/// One row of an interval table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub name: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    /// Columns 4.. in file order
    pub extra: Vec<FieldValue>,
}

impl IntervalRecord {
    pub fn new<S: Into<String>>(name: S, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<FieldValue>) -> Self {
        self.extra = extra;
        self
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.name.clone(), self.start, self.end)
    }

    pub fn len(&self) -> GenomicPos {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl From<Interval> for IntervalRecord {
    fn from(interval: Interval) -> Self {
        IntervalRecord::new(interval.name, interval.start, interval.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        let interval: Interval = "chr1:100-200".parse().unwrap();
        assert_eq!(interval, Interval::new("chr1", 100, 200));
        assert_eq!(interval.len(), 100);

        let interval: Interval = "chr2:1,000-2,500".parse().unwrap();
        assert_eq!(interval.start, 1000);
        assert_eq!(interval.end, 2500);

        let interval: Interval = "HLA-A*01:01:01:01:-3-2".parse().unwrap();
        assert_eq!(interval.name, "HLA-A*01:01:01:01");
        assert_eq!(interval.start, -3);
        assert_eq!(interval.end, 2);
    }

    #[test]
    fn test_region_parsing_errors() {
        assert!(matches!("chr1".parse::<Interval>(), Err(RegionError::Invalid(_))));
        assert!(matches!("chr1:10".parse::<Interval>(), Err(RegionError::Invalid(_))));
        assert!("chr1:a-b".parse::<Interval>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let interval = Interval::new("chrX", 5, 17);
        let parsed: Interval = interval.to_string().parse().unwrap();
        assert_eq!(parsed, interval);
    }

    #[test]
    fn test_record_interval() {
        let record = IntervalRecord::new("chr1", 10, 30)
            .with_extra(vec![FieldValue::Str("peak".to_string()), FieldValue::Int(7)]);
        assert_eq!(record.len(), 20);
        assert!(!record.is_empty());
        assert_eq!(record.interval(), Interval::new("chr1", 10, 30));
        assert_eq!(record.extra[1].to_string(), "7");
        assert_eq!(FieldValue::Null.to_string(), ".");
    }
}
