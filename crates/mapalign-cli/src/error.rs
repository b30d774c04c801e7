//! CLI error handling.

use std::io;
use std::process::ExitCode;

use mapalign_common_config::ConfigError;
use mapalign_extract::ExtractError;
use mapalign_git::GitError;
use mapalign_pipeline::PipelineError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("targets failed: {}", failed.join(", "))]
    TargetsFailed { failed: Vec<String> },

    #[error("render exited with status {exit_code}")]
    RenderFailed { exit_code: i32 },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the numeric exit status for this error
    pub fn code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Network { .. } => 4,
            Self::Validation { .. } => 5,
            Self::TargetsFailed { .. } | Self::RenderFailed { .. } => 8,
            Self::Other(_) => 1,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<GitError> for CliError {
    fn from(err: GitError) -> Self {
        if err.is_network_error() {
            Self::Network {
                message: err.to_string(),
            }
        } else {
            Self::Other(anyhow::Error::new(err))
        }
    }
}

impl From<ExtractError> for CliError {
    fn from(err: ExtractError) -> Self {
        let message = err.to_string();
        match err {
            ExtractError::InvalidPattern { .. } => Self::config(message),
            ExtractError::LogUnreadable { source, .. }
            | ExtractError::ReportWrite { source, .. }
            | ExtractError::Io(source) => Self::io(message, source),
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MissingApiKey { .. } => Self::config(err.to_string()),
            PipelineError::Matcher(e) => e.into(),
            PipelineError::LogReset { .. } => Self::Other(anyhow::Error::new(err)),
            PipelineError::Render(e) => Self::Other(anyhow::Error::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config("x").code(), 2);
        assert_eq!(CliError::validation("x").code(), 5);
        assert_eq!(
            CliError::TargetsFailed {
                failed: vec!["male".into()]
            }
            .code(),
            8
        );
        assert_eq!(CliError::RenderFailed { exit_code: 1 }.code(), 8);
    }

    #[test]
    fn test_unreadable_log_is_io() {
        let err: CliError = ExtractError::LogUnreadable {
            path: PathBuf::from("rat.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert!(matches!(err, CliError::Io { .. }));
        assert!(err.to_string().contains("rat.log"));
    }

    #[test]
    fn test_network_git_error() {
        let err: CliError = GitError::Network {
            message: "timeout".into(),
        }
        .into();
        assert!(matches!(err, CliError::Network { .. }));
    }

    #[test]
    fn test_targets_failed_message() {
        let err = CliError::TargetsFailed {
            failed: vec!["male".into(), "female".into()],
        };
        assert_eq!(err.to_string(), "targets failed: male, female");
    }
}
