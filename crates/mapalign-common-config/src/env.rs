//! `.env` loading and well-known variable names.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dotenv loading errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load {}: {source}", path.display())]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Environment variable names.
pub mod vars {
    /// SciCrunch knowledge-base key consumed by the render tool.
    pub const SCICRUNCH_API_KEY: &str = "SCICRUNCH_API_KEY";
    /// Explicit configuration file, same as `--config`.
    pub const MAPALIGN_CONFIG: &str = "MAPALIGN_CONFIG";
}

/// Files read by [`Environment::init`], in order.
pub const DOTENV_FILES: [&str; 2] = [".env", ".env.local"];

/// Result of loading dotenv files.
#[derive(Debug, Default)]
pub struct Environment {
    loaded: Vec<PathBuf>,
}

impl Environment {
    /// Load `.env` then `.env.local` from the working directory.
    pub fn init() -> Result<Self, EnvError> {
        Self::init_in(".")
    }

    /// Load the dotenv files found in `dir`.
    ///
    /// Variables already set in the process environment are never
    /// overridden, so `.env` wins over `.env.local` for keys both define.
    pub fn init_in(dir: impl AsRef<Path>) -> Result<Self, EnvError> {
        let mut env = Self::default();
        for file in DOTENV_FILES {
            let path = dir.as_ref().join(file);
            match dotenvy::from_path(&path) {
                Ok(()) => env.loaded.push(path),
                Err(e) if e.not_found() => {}
                Err(source) => return Err(EnvError::Dotenv { path, source }),
            }
        }
        Ok(env)
    }

    /// Files that were found and applied.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}
