//! Commit identifiers as they appear in fetch reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A commit id, serialized as its 40-character hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GitOid(git2::Oid);

impl GitOid {
    /// Full hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_string()
    }

    /// Abbreviated form used in log lines.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }
}

impl From<git2::Oid> for GitOid {
    fn from(oid: git2::Oid) -> Self {
        Self(oid)
    }
}

impl From<GitOid> for git2::Oid {
    fn from(oid: GitOid) -> Self {
        oid.0
    }
}

impl From<GitOid> for String {
    fn from(oid: GitOid) -> Self {
        oid.to_hex()
    }
}

impl TryFrom<String> for GitOid {
    type Error = GitOidError;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        hex.parse()
    }
}

impl FromStr for GitOid {
    type Err = GitOidError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        if hex.len() != 40 {
            return Err(GitOidError::InvalidHex(hex.to_string()));
        }
        git2::Oid::from_str(hex)
            .map(Self)
            .map_err(|_| GitOidError::InvalidHex(hex.to_string()))
    }
}

impl fmt::Display for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for GitOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GitOid").field(&self.short()).finish()
    }
}

/// Malformed commit id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GitOidError {
    /// Not 40 hex digits.
    #[error("not a full commit id: {0:?}")]
    InvalidHex(String),
}
