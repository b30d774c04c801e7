//! Classifying a checkout directory before fetching into it.

use crate::{GitError, GitResult};
use git2::{ErrorCode, Repository};
use std::path::Path;

/// Open the repository rooted exactly at `path`.
///
/// No parent directories are searched: a source checkout nested inside
/// another repository must not resolve to the outer one.
pub fn open_repo(path: impl AsRef<Path>) -> GitResult<Repository> {
    let path = path.as_ref();
    match Repository::open(path) {
        Ok(repo) => Ok(repo),
        Err(e) if e.code() == ErrorCode::NotFound => {
            let exists = path.exists();
            let path = path.display().to_string();
            Err(if exists {
                GitError::NotARepo { path }
            } else {
                GitError::RepoNotFound { path }
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// True when `path` is missing or an empty directory, i.e. a clone target.
pub fn is_clone_target(path: impl AsRef<Path>) -> GitResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(std::fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_path() {
        let dir = TempDir::new().unwrap();
        let err = open_repo(dir.path().join("nowhere")).err().unwrap();
        assert!(matches!(err, GitError::RepoNotFound { .. }));
    }

    #[test]
    fn test_open_plain_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README"), "hello").unwrap();
        let err = open_repo(dir.path()).err().unwrap();
        assert!(matches!(err, GitError::NotARepo { .. }));
    }

    #[test]
    fn test_open_does_not_search_parents() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("sources/rat-flatmap");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(open_repo(dir.path()).is_ok());
        assert!(matches!(
            open_repo(&nested).err().unwrap(),
            GitError::NotARepo { .. }
        ));
    }

    #[test]
    fn test_clone_target() {
        let dir = TempDir::new().unwrap();
        assert!(is_clone_target(dir.path().join("missing")).unwrap());
        assert!(is_clone_target(dir.path()).unwrap());
        std::fs::write(dir.path().join("file"), "x").unwrap();
        assert!(!is_clone_target(dir.path()).unwrap());
        assert!(!is_clone_target(dir.path().join("file")).unwrap());
    }
}
