//! Branch selection for source checkouts.

use crate::{GitError, GitRepository, GitResult};
use git2::{BranchType, Repository};
use tracing::debug;

impl GitRepository {
    /// Whether a local branch named `name` exists.
    pub fn has_local_branch(&self, name: &str) -> bool {
        self.with_repo(|repo| repo.find_branch(name, BranchType::Local).is_ok())
    }

    /// Current branch name. `None` on a detached HEAD.
    pub fn current_branch(&self) -> GitResult<Option<String>> {
        self.with_repo(|repo| {
            let head = repo.head()?;
            Ok(head
                .is_branch()
                .then(|| head.shorthand().map(String::from))
                .flatten())
        })
    }

    /// Check out `name`, creating it from `<remote>/<name>` with upstream
    /// tracking when no local branch exists yet.
    pub fn checkout_tracking(&self, name: &str, remote: &str) -> GitResult<()> {
        self.with_repo(|repo| {
            if repo.find_branch(name, BranchType::Local).is_err() {
                create_tracking(repo, name, remote)?;
            }
            checkout_local(repo, name)
        })
    }
}

fn create_tracking(repo: &Repository, name: &str, remote: &str) -> GitResult<()> {
    let upstream = format!("{remote}/{name}");
    debug!(branch = name, upstream = %upstream, "creating tracking branch");

    let tip = repo
        .find_branch(&upstream, BranchType::Remote)
        .map_err(|_| GitError::BranchNotFound {
            name: name.to_string(),
        })?
        .get()
        .peel_to_commit()?;
    repo.branch(name, &tip, false)?.set_upstream(Some(&upstream))?;
    Ok(())
}

fn checkout_local(repo: &Repository, name: &str) -> GitResult<()> {
    let reference = repo
        .find_branch(name, BranchType::Local)
        .map_err(|_| GitError::BranchNotFound {
            name: name.to_string(),
        })?
        .into_reference();
    let refname = reference
        .name()
        .ok_or_else(|| GitError::RefNotFound {
            name: name.to_string(),
        })?
        .to_string();

    let commit = reference.peel_to_commit()?;
    repo.checkout_tree(commit.as_object(), None)?;
    repo.set_head(&refname)?;
    Ok(())
}
