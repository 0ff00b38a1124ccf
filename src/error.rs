//! Error types for microagg.

use thiserror::Error;

/// Errors that can occur while loading, partitioning or perturbing a dataset.
#[derive(Debug, Error)]
pub enum SdcError {
    /// Microaggregation parameter out of range (k must be at least 2).
    #[error("invalid microaggregation parameter k = {k}: k must be at least 2")]
    InvalidK { k: usize },

    /// The dataset has fewer records than the requested group size.
    #[error("dataset has {records} records, fewer than k = {k}")]
    DatasetTooSmall { records: usize, k: usize },

    /// Degenerate nearest-neighbour query (k too large for the dataset).
    #[error("requested {requested} nearest records but only {available} other records exist")]
    TooManyNeighbours { requested: usize, available: usize },

    /// A record (or partition) does not match the width of the dataset it is used with.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// No attribute with that name.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The operation needs at least one attribute of a class that is not declared.
    #[error("no {0} attributes declared")]
    NoAttributes(&'static str),

    /// Malformed input text.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader/writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SdcError>;
