//! Render execution.

use crate::{LogCapture, RenderError, RenderJob, RenderResult, RenderTool};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Result of one render invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Process exit code; -1 when killed or terminated by a signal.
    pub exit_code: i32,
    /// Log file the diagnostics were captured into.
    pub log_file: Option<PathBuf>,
    /// Whether the render was killed on timeout.
    pub timed_out: bool,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl RenderOutcome {
    /// True when the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Runs one render job to completion.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `job`. A failing tool yields an unsuccessful outcome, not an error.
    async fn render(&self, job: &RenderJob) -> RenderResult<RenderOutcome>;
}

/// [`Renderer`] spawning the external tool as a subprocess.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    tool: RenderTool,
    working_dir: Option<PathBuf>,
}

impl ProcessRenderer {
    pub fn new(tool: RenderTool) -> Self {
        Self {
            tool,
            working_dir: None,
        }
    }

    /// Run the tool from `dir` instead of the current directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn tool(&self) -> &RenderTool {
        &self.tool
    }

    fn command(&self, job: &RenderJob) -> RenderResult<Command> {
        let mut cmd = Command::new(&self.tool.program);
        cmd.args(job.to_args(&self.tool))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.tool.env {
            cmd.env(key, value);
        }
        for (key, value) in job.secrets() {
            cmd.env(key, value.expose());
        }

        if let Some(path) = job.log_path() {
            prepare_log_parent(path)?;
            if self.tool.capture == LogCapture::Redirect {
                let log = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| RenderError::LogFile {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let err = log.try_clone()?;
                cmd.stdout(Stdio::from(log)).stderr(Stdio::from(err));
            }
        }
        Ok(cmd)
    }
}

fn prepare_log_parent(path: &Path) -> RenderResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::LogFile {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl Renderer for ProcessRenderer {
    #[instrument(skip(self, job), fields(program = %self.tool.program, manifest = %job.manifest()))]
    async fn render(&self, job: &RenderJob) -> RenderResult<RenderOutcome> {
        let start = Instant::now();
        let mut cmd = self.command(job)?;

        debug!(args = ?job.to_args(&self.tool), "spawning render");
        let mut child = cmd
            .spawn()
            .map_err(|e| RenderError::spawn(&self.tool.program, e))?;

        let (exit_code, timed_out) = match self.tool.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => (status?.code().unwrap_or(-1), false),
                Err(_) => {
                    warn!(timeout = ?limit, "render timed out, killing");
                    let _ = child.kill().await;
                    (-1, true)
                }
            },
            None => (child.wait().await?.code().unwrap_or(-1), false),
        };

        let outcome = RenderOutcome {
            exit_code,
            log_file: job.log_path().map(Path::to_path_buf),
            timed_out,
            duration: start.elapsed(),
        };

        if outcome.success() {
            info!(duration = ?outcome.duration, "render finished");
        } else {
            warn!(exit_code, timed_out, "render failed");
        }
        Ok(outcome)
    }
}
