//! Render error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing or launching a render.
///
/// A render tool that runs and exits non-zero is not an error; see
/// [`crate::RenderOutcome::success`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log directory {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl RenderError {
    pub(crate) fn spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::ProgramNotFound {
                program: program.to_string(),
            }
        } else {
            Self::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_spawn_not_found_is_program_not_found() {
        let err = RenderError::spawn("mapmaker", io::Error::new(io::ErrorKind::NotFound, "nope"));
        assert!(matches!(err, RenderError::ProgramNotFound { ref program } if program == "mapmaker"));
        assert_eq!(err.to_string(), "render program not found: mapmaker");
    }

    #[test]
    fn test_spawn_other_error() {
        let err = RenderError::spawn(
            "mapmaker",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, RenderError::Spawn { .. }));
    }
}
