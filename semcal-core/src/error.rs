//! Error types for semcal.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while loading or validating calendar data.
///
/// The layout functions themselves never fail; errors only come from the
/// input boundary (files, documents, configuration).
#[derive(Error, Debug)]
pub enum CalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Event '{id}' ends before it starts ({start} > {end})")]
    InvertedRange {
        id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid cycle: {0}")]
    InvalidCycle(String),

    #[error("Unsupported event source: {0}")]
    UnsupportedSource(String),
}

/// Result type alias for semcal operations.
pub type CalResult<T> = Result<T, CalError>;
