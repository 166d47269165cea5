//! Error types
//!
//! Nothing in the simulation itself is fatal. These errors only come out of
//! constructors that validate collaborator-supplied data.

use thiserror::Error;

/// A section descriptor that cannot be turned into a bitmap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("section has zero size ({width}x{height})")]
    Empty { width: usize, height: usize },
    #[error("pixel buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    PixelCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("ascii section row {row} is {actual} wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Failure to read tuning values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure to read or write the best-score record
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to access highscore file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid highscore json: {0}")]
    Json(#[from] serde_json::Error),
}
