//! Error types for loading, training and reporting.

use thiserror::Error;

/// A row of the patient table could not be turned into a record.
///
/// Every variant aborts the whole load.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected {expected} fields, but got {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse {column} value {value:?} as {expected}")]
    Field {
        line: u64,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("input shape mismatch: expected {expected} features, got {found}")]
    InputShape { expected: usize, found: usize },

    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),

    #[error("backward called before any forward pass")]
    NoForwardPass,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plot error: {0}")]
    Plot(String),
}
