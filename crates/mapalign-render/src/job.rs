//! Render jobs and the tool invocation they are rendered with.

use mapalign_common_config::RenderConfig;
use mapalign_common_secret::SecretString;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the render tool's diagnostics reach the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogCapture {
    /// Append the tool's stdout and stderr to the log file.
    Redirect,
    /// Pass `<flag> <log path>` and let the tool write the log itself.
    Flag(String),
}

/// Invocation template for the external render tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTool {
    pub program: String,
    pub args: Vec<String>,
    pub manifest_flag: String,
    pub output_flag: String,
    pub ignore_git_flag: String,
    pub debug_flag: String,
    pub force_flag: String,
    pub flat_layout_flag: String,
    pub background_tiles_flag: String,
    pub capture: LogCapture,
    pub timeout: Option<Duration>,
    pub env: BTreeMap<String, String>,
}

impl RenderTool {
    /// Tool running `program` with the stock mapmaker flag names.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::from(&RenderConfig::default())
        }
    }

    /// Leading arguments placed before every generated flag.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Select the log capture mode.
    pub fn capture(mut self, capture: LogCapture) -> Self {
        self.capture = capture;
        self
    }

    /// Kill renders that run longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&RenderConfig> for RenderTool {
    fn from(config: &RenderConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            manifest_flag: config.manifest_flag.clone(),
            output_flag: config.output_flag.clone(),
            ignore_git_flag: config.ignore_git_flag.clone(),
            debug_flag: config.debug_flag.clone(),
            force_flag: config.force_flag.clone(),
            flat_layout_flag: config.flat_layout_flag.clone(),
            background_tiles_flag: config.background_tiles_flag.clone(),
            capture: match &config.log_flag {
                Some(flag) => LogCapture::Flag(flag.clone()),
                None => LogCapture::Redirect,
            },
            timeout: config.timeout_secs.map(Duration::from_secs),
            env: config.env.clone(),
        }
    }
}

/// One invocation of the render tool against one manifest.
///
/// # Example
///
/// ```
/// use mapalign_render::{RenderJob, RenderTool};
///
/// let job = RenderJob::new("sources/rat-flatmap/manifest.json", "flatmaps")
///     .log_file("alignment/log/rat.log")
///     .ignore_git(true)
///     .debug(true);
///
/// let args = job.to_args(&RenderTool::new("mapmaker"));
/// assert_eq!(
///     args,
///     [
///         "--manifest",
///         "sources/rat-flatmap/manifest.json",
///         "--output",
///         "flatmaps",
///         "--ignore-git",
///         "--debug",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RenderJob {
    manifest: String,
    output_dir: PathBuf,
    log_file: Option<PathBuf>,
    ignore_git: bool,
    debug: bool,
    force: bool,
    flat_layout: bool,
    background_tiles: bool,
    secret_env: Vec<(String, SecretString)>,
}

impl RenderJob {
    /// Render `manifest` (path or URL) into `output_dir`.
    pub fn new(manifest: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            output_dir: output_dir.into(),
            log_file: None,
            ignore_git: false,
            debug: false,
            force: false,
            flat_layout: false,
            background_tiles: false,
            secret_env: Vec::new(),
        }
    }

    /// Capture diagnostics into `path`.
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn ignore_git(mut self, enabled: bool) -> Self {
        self.ignore_git = enabled;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn force(mut self, enabled: bool) -> Self {
        self.force = enabled;
        self
    }

    pub fn flat_layout(mut self, enabled: bool) -> Self {
        self.flat_layout = enabled;
        self
    }

    pub fn background_tiles(mut self, enabled: bool) -> Self {
        self.background_tiles = enabled;
        self
    }

    /// Pass a credential to the tool through its environment.
    pub fn secret_env(mut self, key: impl Into<String>, value: SecretString) -> Self {
        self.secret_env.push((key.into(), value));
        self
    }

    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub(crate) fn secrets(&self) -> &[(String, SecretString)] {
        &self.secret_env
    }

    /// Command-line arguments for `tool`, excluding the program itself.
    pub fn to_args(&self, tool: &RenderTool) -> Vec<String> {
        let mut args = tool.args.clone();
        args.push(tool.manifest_flag.clone());
        args.push(self.manifest.clone());
        args.push(tool.output_flag.clone());
        args.push(self.output_dir.to_string_lossy().into_owned());

        let switches = [
            (self.ignore_git, &tool.ignore_git_flag),
            (self.debug, &tool.debug_flag),
            (self.force, &tool.force_flag),
            (self.flat_layout, &tool.flat_layout_flag),
            (self.background_tiles, &tool.background_tiles_flag),
        ];
        args.extend(
            switches
                .into_iter()
                .filter(|(on, _)| *on)
                .map(|(_, flag)| flag.clone()),
        );

        if let (LogCapture::Flag(flag), Some(path)) = (&tool.capture, &self.log_file) {
            args.push(flag.clone());
            args.push(path.to_string_lossy().into_owned());
        }
        args
    }
}
