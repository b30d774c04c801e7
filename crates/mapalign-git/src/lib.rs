//! Source repository fetching for mapalign.
//!
//! Thin wrappers around git2: clone a flatmap source repository when it is
//! not present locally, then switch it to the branch the alignment run uses.

#![warn(missing_docs)]

pub mod branch;
pub mod detect;
pub mod error;
pub mod fetcher;
pub mod oid;
pub mod repository;

pub use detect::{is_clone_target, open_repo};
pub use error::{GitError, GitResult};
pub use fetcher::{FetchOutcome, FetchRequest, GitFetcher, SourceFetcher, DEFAULT_REMOTE};
pub use oid::{GitOid, GitOidError};
pub use repository::GitRepository;

pub use git2;
