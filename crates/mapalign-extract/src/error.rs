//! Extraction error types.

use std::path::PathBuf;
use thiserror::Error;

/// Extraction errors.
///
/// Unrecognised log lines are never errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read log {path}: {source}")]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {role} pattern `{pattern}`: {message}")]
    InvalidPattern {
        role: &'static str,
        pattern: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;
