//! Configuration file loading and parsing.

use crate::types::MapalignConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file location relative to the project directory.
pub const CONFIG_FILE: &str = ".mapalign/config.yaml";

static ENV_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env reference pattern is valid")
});

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
    explicit_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
            explicit_file: None,
        }
    }

    /// Create a loader for an explicit config file.
    ///
    /// Unlike [`ConfigLoader::new`], a missing file is an error.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let base_path = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        Self {
            base_path,
            explicit_file: Some(path.to_path_buf()),
        }
    }

    /// Path the configuration is read from.
    pub fn config_path(&self) -> PathBuf {
        self.explicit_file
            .clone()
            .unwrap_or_else(|| self.base_path.join(CONFIG_FILE))
    }

    /// Directory relative paths in the configuration are resolved against.
    pub fn project_dir(&self) -> &Path {
        &self.base_path
    }

    /// Load configuration, falling back to defaults when no project config exists.
    pub fn load(&self) -> Result<MapalignConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            if self.explicit_file.is_some() {
                return Err(ConfigError::NotFound { path: config_path });
            }
            return Ok(MapalignConfig::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        self.parse(&contents)
    }

    /// Parse and validate configuration text.
    pub fn parse(&self, contents: &str) -> Result<MapalignConfig, ConfigError> {
        let expanded = self.expand_env_vars(contents)?;

        // An empty document is `null` to serde_yaml.
        let config: MapalignConfig = if expanded.trim().is_empty() {
            MapalignConfig::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        };

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut missing = None;
        let expanded = ENV_REF.replace_all(content, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match cap.get(2) {
                    Some(d) => d.as_str().to_string(),
                    None => {
                        missing.get_or_insert_with(|| var_name.to_string());
                        String::new()
                    }
                },
            }
        });

        match missing {
            Some(var) => Err(ConfigError::EnvVarNotFound { var }),
            None => Ok(expanded.into_owned()),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &MapalignConfig) -> Result<(), ConfigError> {
        if config.targets.is_empty() {
            return Err(invalid("at least one target must be configured"));
        }

        let mut names = HashSet::new();
        let mut logs = HashSet::new();
        for target in &config.targets {
            if target.name.trim().is_empty() {
                return Err(invalid("target names must not be empty"));
            }
            if !names.insert(target.name.as_str()) {
                return Err(invalid(format!("duplicate target name: {}", target.name)));
            }
            if !logs.insert(target.log_file.as_path()) {
                return Err(invalid(format!(
                    "targets share a log file: {}",
                    target.log_file.display()
                )));
            }
            if let Some(repo) = &target.repository {
                if config.repository(repo).is_none() {
                    return Err(invalid(format!(
                        "target {} references unknown repository {repo}",
                        target.name
                    )));
                }
            }
        }

        let mut repos = HashSet::new();
        for repo in &config.repositories {
            if !repos.insert(repo.name.as_str()) {
                return Err(invalid(format!("duplicate repository name: {}", repo.name)));
            }
            if repo.branch.trim().is_empty() {
                return Err(invalid(format!("repository {} has no branch", repo.name)));
            }
        }

        if config.render.program.trim().is_empty() {
            return Err(invalid("render.program must not be empty"));
        }

        if config.render.timeout_secs == Some(0) {
            return Err(invalid("render.timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, config: &MapalignConfig) -> Result<(), ConfigError> {
        let config_path = self.config_path();
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = to_yaml(config)?;
        std::fs::write(config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Render a configuration as YAML.
pub fn to_yaml(config: &MapalignConfig) -> Result<String, ConfigError> {
    serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
        line: None,
        message: e.to_string(),
    })
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}
