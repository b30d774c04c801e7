//! Pipeline error types.

use mapalign_extract::ExtractError;
use mapalign_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a pipeline or publish run as a whole.
///
/// Per-target failures are recorded in the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot reset log directory {path}: {source}")]
    LogReset {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("environment variable {var} is not set; the publish render needs an API key")]
    MissingApiKey { var: String },

    #[error("invalid matcher configuration: {0}")]
    Matcher(#[from] ExtractError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;
