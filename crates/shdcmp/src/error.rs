use std::path::PathBuf;

use thiserror::Error;

use crate::header::GridShape;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("File too short: need {needed} bytes to read {what}, have {len}")]
    Truncated {
        what: String,
        needed: u64,
        len: u64,
    },

    #[error("Record length {word_length} cannot hold whole complex samples")]
    UnpairedRecordLength { word_length: u32 },

    #[error("Grid shape mismatch: left {left}, right {right}")]
    GridShapeMismatch { left: GridShape, right: GridShape },

    #[error("Declared range count NRr {num_ranges} does not fit record length {word_length} (need NRr * 2 <= reclen)")]
    RangeCapacity { num_ranges: u32, word_length: u32 },

    #[error("Invalid file size: {which} file is {actual} bytes, {shape} with reclen {word_length} needs {expected}")]
    FileSize {
        which: String,
        actual: u64,
        expected: u64,
        shape: GridShape,
        word_length: u32,
    },
}

/// Severity tier of a single element discrepancy.
///
/// Ordered so that `max` over a scan yields the worst tier seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Silent,
    Printable,
    Alarm,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Silent => "silent",
            Severity::Printable => "printable",
            Severity::Alarm => "alarm",
        };
        write!(f, "{name}")
    }
}
