//! Git error types.

use thiserror::Error;

/// Git operation error.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found.
    #[error("repository not found at {path}")]
    RepoNotFound { path: String },

    /// Destination exists but is not a git repository.
    #[error("not a git repository: {path}")]
    NotARepo { path: String },

    /// Reference not found.
    #[error("reference not found: {name}")]
    RefNotFound { name: String },

    /// Branch not found locally or on the remote.
    #[error("branch not found: {name}")]
    BranchNotFound { name: String },

    /// Authentication failed.
    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    /// Network error.
    #[error("network error: {message}")]
    Network { message: String },

    /// Git2 library error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Git operations.
pub type GitResult<T> = Result<T, GitError>;

impl GitError {
    /// Check if this is a network-related error.
    pub fn is_network_error(&self) -> bool {
        match self {
            Self::Network { .. } | Self::AuthFailed { .. } => true,
            Self::Git2(e) => {
                matches!(
                    e.class(),
                    git2::ErrorClass::Net | git2::ErrorClass::Http | git2::ErrorClass::Ssh
                )
            }
            _ => false,
        }
    }

    /// Classify an error raised while talking to a remote.
    pub(crate) fn from_remote(err: git2::Error) -> Self {
        if err.code() == git2::ErrorCode::Auth {
            return Self::AuthFailed {
                reason: err.message().to_string(),
            };
        }
        match err.class() {
            git2::ErrorClass::Net | git2::ErrorClass::Http | git2::ErrorClass::Ssh => {
                Self::Network {
                    message: err.message().to_string(),
                }
            }
            _ => Self::Git2(err),
        }
    }
}
