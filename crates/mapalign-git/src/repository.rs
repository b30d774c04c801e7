//! A local source checkout.

use crate::{detect, GitError, GitOid, GitResult};
use git2::Repository;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A checkout that can be shared across threads.
///
/// libgit2 handles are not `Sync`; access goes through a lock.
pub struct GitRepository {
    repo: Mutex<Repository>,
    workdir: PathBuf,
}

impl GitRepository {
    fn wrap(repo: Repository) -> Self {
        let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Self {
            repo: Mutex::new(repo),
            workdir,
        }
    }

    /// Open the checkout at `path`. See [`detect::open_repo`].
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        detect::open_repo(path).map(Self::wrap)
    }

    /// Clone `url` into `path`, creating missing parent directories.
    ///
    /// Remote failures are classified as [`GitError::Network`] or
    /// [`GitError::AuthFailed`].
    pub fn clone(url: &str, path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        debug!(url, path = %path.display(), "cloning repository");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Repository::clone(url, path)
            .map(Self::wrap)
            .map_err(GitError::from_remote)
    }

    /// Working tree root.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub(crate) fn with_repo<T>(&self, f: impl FnOnce(&Repository) -> T) -> T {
        f(&*self.repo.lock())
    }

    /// Commit HEAD points at.
    pub fn head_oid(&self) -> GitResult<GitOid> {
        self.with_repo(|repo| {
            repo.head()?
                .target()
                .map(GitOid::from)
                .ok_or_else(|| GitError::RefNotFound {
                    name: "HEAD".to_string(),
                })
        })
    }

    /// URL configured for `remote`, if the remote exists.
    pub fn remote_url(&self, remote: &str) -> GitResult<Option<String>> {
        self.with_repo(|repo| match repo.find_remote(remote) {
            Ok(r) => Ok(r.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        })
    }
}
