//! Tests for cloning and branch selection against a local upstream.

use git2::{Oid, Repository, Signature};
use mapalign_git::{FetchRequest, GitError, GitFetcher, GitOid, GitRepository, SourceFetcher};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Commit `file` with `content` onto `refs/heads/<branch>`, parented on its current tip.
fn commit_on(repo: &Repository, branch: &str, file: &str, content: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(file), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let refname = format!("refs/heads/{branch}");
    let parent = repo
        .find_reference(&refname)
        .ok()
        .and_then(|r| r.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    let sig = Signature::now("Test", "test@example.com").unwrap();
    repo.commit(Some(&refname), &sig, &sig, content, &tree, &parents)
        .unwrap()
}

/// Upstream with `main` (HEAD) and an `npo` branch one commit ahead.
fn upstream(dir: &Path) -> (Oid, Oid) {
    let repo = Repository::init(dir).unwrap();
    let main = commit_on(&repo, "main", "manifest.json", "{\"id\": \"rat\"}");
    repo.set_head("refs/heads/main").unwrap();

    let main_commit = repo.find_commit(main).unwrap();
    repo.branch("npo", &main_commit, false).unwrap();
    let npo = commit_on(&repo, "npo", "npo.json", "{}");
    (main, npo)
}

fn request(url: &Path, path: &Path, branch: &str) -> FetchRequest {
    FetchRequest {
        name: "rat-flatmap".to_string(),
        url: url.to_string_lossy().into_owned(),
        path: path.to_path_buf(),
        branch: branch.to_string(),
    }
}

#[test]
fn test_fetch_clones_missing_checkout() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    let (main, _) = upstream(&remote);
    let local = temp.path().join("sources/rat-flatmap");

    let outcome = GitFetcher::new()
        .fetch(&request(&remote, &local, "main"))
        .unwrap();

    assert!(outcome.cloned);
    assert_eq!(outcome.branch, "main");
    assert_eq!(outcome.head, GitOid::from(main));
    assert!(local.join("manifest.json").exists());
}

#[test]
fn test_fetch_checks_out_non_default_branch() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    let (_, npo) = upstream(&remote);
    let local = temp.path().join("checkout");

    let outcome = GitFetcher::new()
        .fetch(&request(&remote, &local, "npo"))
        .unwrap();

    assert_eq!(outcome.head, GitOid::from(npo));
    let repo = GitRepository::open(&local).unwrap();
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("npo"));
    assert!(repo.has_local_branch("main"));
    assert_eq!(
        repo.remote_url("origin").unwrap().as_deref(),
        Some(remote.to_string_lossy().as_ref())
    );
    assert_eq!(repo.remote_url("upstream").unwrap(), None);
    assert!(local.join("npo.json").exists());
}

#[test]
fn test_fetch_reuses_existing_checkout() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    let (main, npo) = upstream(&remote);
    let local = temp.path().join("checkout");
    let fetcher = GitFetcher::new();

    let first = fetcher.fetch(&request(&remote, &local, "main")).unwrap();
    assert!(first.cloned);

    let again = fetcher.fetch(&request(&remote, &local, "main")).unwrap();
    assert!(!again.cloned);
    assert_eq!(again.head, GitOid::from(main));

    let switched = fetcher.fetch(&request(&remote, &local, "npo")).unwrap();
    assert!(!switched.cloned);
    assert_eq!(switched.head, GitOid::from(npo));
}

#[test]
fn test_fetch_existing_checkout_with_renamed_remote() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    let (_, npo) = upstream(&remote);
    let local = temp.path().join("checkout");
    GitFetcher::new()
        .fetch(&request(&remote, &local, "main"))
        .unwrap();
    Repository::open(&local)
        .unwrap()
        .remote_rename("origin", "upstream")
        .unwrap();

    let err = GitFetcher::new()
        .fetch(&request(&remote, &local, "npo"))
        .unwrap_err();
    assert!(matches!(err, GitError::BranchNotFound { .. }));

    let outcome = GitFetcher::new()
        .with_remote("upstream")
        .fetch(&request(&remote, &local, "npo"))
        .unwrap();
    assert!(!outcome.cloned);
    assert_eq!(outcome.head, GitOid::from(npo));
}

#[test]
fn test_fetch_into_empty_directory_clones() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    upstream(&remote);
    let local = temp.path().join("empty");
    fs::create_dir_all(&local).unwrap();

    let outcome = GitFetcher::new()
        .fetch(&request(&remote, &local, "main"))
        .unwrap();
    assert!(outcome.cloned);
}

#[test]
fn test_fetch_unknown_branch() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    upstream(&remote);
    let local = temp.path().join("checkout");

    let err = GitFetcher::new()
        .fetch(&request(&remote, &local, "does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, GitError::BranchNotFound { ref name } if name == "does-not-exist"));
}

#[test]
fn test_fetch_rejects_non_repository_directory() {
    let temp = TempDir::new().unwrap();
    let remote = temp.path().join("remote");
    upstream(&remote);
    let local = temp.path().join("occupied");
    fs::create_dir_all(&local).unwrap();
    fs::write(local.join("notes.txt"), "not a repository").unwrap();

    let err = GitFetcher::new()
        .fetch(&request(&remote, &local, "main"))
        .unwrap_err();
    assert!(matches!(err, GitError::NotARepo { .. }));
}

#[test]
fn test_fetch_unreachable_remote() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("checkout");

    let result = GitFetcher::new().fetch(&request(
        &temp.path().join("no-such-remote"),
        &local,
        "main",
    ));
    assert!(result.is_err());
}
