//! Error types for the record engine.

use thiserror::Error;

/// Why a textual mark was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MarkError {
    #[error("not an integer")]
    NotAnInteger,

    #[error("out of range")]
    OutOfRange,
}

/// Failures surfaced by the engine. All of them are recoverable; the caller
/// decides whether to re-prompt, report, or exit.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Invalid mark: {0}")]
    InvalidMark(#[from] MarkError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Only produced by a strict load.
    #[error("row {row}: cannot read column {column:?} from value {value:?}")]
    Malformed {
        row: usize,
        column: String,
        value: String,
    },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, RosterError>;
