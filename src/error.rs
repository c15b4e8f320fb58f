//! Error types for the pipeline
//!
//! Row-level problems (bad raw rows, short history, unalignable series) are
//! recovered by exclusion and logged at the point of failure; split and
//! configuration problems abort the run.

use thiserror::Error;

/// Error taxonomy for the freight pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed raw input that cannot be interpreted as a table
    #[error("parse error in {path} (line {line}): {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },

    /// A feature needs more lookback rows than the data provides
    #[error("insufficient history for feature '{feature}': needs {needed} rows, {available} available")]
    InsufficientHistory {
        feature: String,
        needed: usize,
        available: usize,
    },

    /// A series (or derived column) cannot be mapped onto the canonical calendar
    #[error("alignment error for '{series}': {reason}")]
    Alignment { series: String, reason: String },

    /// Split boundaries are non-monotonic or leave an empty partition
    #[error("invalid split: {reason}")]
    InvalidSplit { reason: String },

    /// Bad pipeline configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
