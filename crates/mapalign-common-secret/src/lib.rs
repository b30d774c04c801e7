//! Credentials handed to the render tool.
//!
//! The SciCrunch API key travels from the environment to the child process
//! and nowhere else: it formats as `[REDACTED]` and is wiped on drop.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const REDACTED: &str = "[REDACTED]";

/// A string credential.
///
/// ```rust
/// use mapalign_common_secret::SecretString;
///
/// let key = SecretString::new("abc123".to_string());
/// assert_eq!(format!("{key} {key:?}"), "[REDACTED] SecretString([REDACTED])");
/// assert_eq!(key.expose(), "abc123");
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Read `var` from the process environment. Empty values count as unset.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(Self)
    }

    /// The plain value, for handing to a child process.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({REDACTED})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_never_leaks() {
        let key = SecretString::new("my-api-key".to_string());
        let shown = format!("{key} {key:?} {:?}", Some(&key));
        assert!(!shown.contains("my-api-key"));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("MAPALIGN_SECRET_TEST", "k-123");
        let key = SecretString::from_env("MAPALIGN_SECRET_TEST").unwrap();
        assert_eq!(key.expose(), "k-123");

        std::env::set_var("MAPALIGN_SECRET_TEST", "");
        assert!(SecretString::from_env("MAPALIGN_SECRET_TEST").is_none());
        std::env::remove_var("MAPALIGN_SECRET_TEST");
        assert!(SecretString::from_env("MAPALIGN_SECRET_TEST").is_none());
    }

    #[test]
    fn test_zeroize_clears_value() {
        let mut key = SecretString::new("wipe-me".to_string());
        key.zeroize();
        assert_eq!(key.expose(), "");
    }
}
