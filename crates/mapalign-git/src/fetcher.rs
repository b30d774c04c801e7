//! Repository fetcher: make a named source tree exist at a given branch.

use crate::{detect, GitOid, GitRepository, GitResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Remote name used for clones.
pub const DEFAULT_REMOTE: &str = "origin";

/// What to fetch and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Repository name, used for logging and reporting.
    pub name: String,
    /// Clone URL or local path.
    pub url: String,
    /// Checkout directory.
    pub path: PathBuf,
    /// Branch to switch to.
    pub branch: String,
}

/// Result of a successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// Repository name.
    pub name: String,
    /// Checkout directory.
    pub path: PathBuf,
    /// Branch checked out.
    pub branch: String,
    /// Whether this call performed the clone.
    pub cloned: bool,
    /// Commit at HEAD after checkout.
    pub head: GitOid,
}

/// Ensures a source tree exists locally at a given branch.
pub trait SourceFetcher: Send + Sync {
    /// Clone if needed, then switch to the requested branch.
    fn fetch(&self, request: &FetchRequest) -> GitResult<FetchOutcome>;
}

/// [`SourceFetcher`] backed by libgit2.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    remote: String,
}

impl GitFetcher {
    /// Create a fetcher using the `origin` remote.
    pub fn new() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Use a different remote name when resolving branches of existing checkouts.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFetcher for GitFetcher {
    #[instrument(skip(self, request), fields(repo = %request.name, branch = %request.branch))]
    fn fetch(&self, request: &FetchRequest) -> GitResult<FetchOutcome> {
        let cloned = detect::is_clone_target(&request.path)?;
        let repo = if cloned {
            info!(url = %request.url, path = %request.path.display(), "cloning");
            GitRepository::clone(&request.url, &request.path)?
        } else {
            let repo = GitRepository::open(&request.path)?;
            if let Some(url) = repo.remote_url(&self.remote)? {
                if url != request.url {
                    warn!(configured = %request.url, actual = %url, "checkout tracks a different remote");
                }
            }
            repo
        };

        // A fresh clone only knows `origin`.
        let remote = if cloned { DEFAULT_REMOTE } else { self.remote.as_str() };
        repo.checkout_tracking(&request.branch, remote)?;
        let head = repo.head_oid()?;

        info!(head = %head.short(), cloned, "source tree ready");

        Ok(FetchOutcome {
            name: request.name.clone(),
            path: request.path.clone(),
            branch: request.branch.clone(),
            cloned,
            head,
        })
    }
}
