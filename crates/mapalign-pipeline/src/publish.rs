//! Single-manifest render used by CI.

use crate::{PipelineError, PipelineResult};
use mapalign_common_config::PublishConfig;
use mapalign_common_secret::SecretString;
use mapalign_render::{RenderJob, RenderOutcome, Renderer};
use std::path::PathBuf;
use tracing::{info, instrument};

/// A render with regeneration, flat layout and background tiles, and no
/// report extraction.
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub manifest: String,
    pub output_dir: PathBuf,
    pub force: bool,
    pub flat_layout: bool,
    pub background_tiles: bool,
    /// Environment variable the key is handed to the tool under.
    pub api_key_env: String,
    pub api_key: Option<SecretString>,
}

impl PublishJob {
    /// Job from configuration, reading the key from the process environment.
    pub fn from_config(config: &PublishConfig) -> Self {
        Self {
            manifest: config.manifest.clone(),
            output_dir: config.output_dir.clone(),
            force: config.force,
            flat_layout: config.flat_layout,
            background_tiles: config.background_tiles,
            api_key_env: config.api_key_env.clone(),
            api_key: SecretString::from_env(&config.api_key_env),
        }
    }

    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    fn render_job(&self) -> PipelineResult<RenderJob> {
        let key = self
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::MissingApiKey {
                var: self.api_key_env.clone(),
            })?;

        Ok(RenderJob::new(self.manifest.clone(), self.output_dir.clone())
            .force(self.force)
            .flat_layout(self.flat_layout)
            .background_tiles(self.background_tiles)
            .secret_env(self.api_key_env.clone(), key))
    }
}

/// Render the publish manifest once.
///
/// Fails before spawning anything when no API key is available. A tool
/// that exits non-zero is returned as an unsuccessful outcome.
#[instrument(skip(renderer, job), fields(manifest = %job.manifest))]
pub async fn publish<R: Renderer + ?Sized>(
    renderer: &R,
    job: &PublishJob,
) -> PipelineResult<RenderOutcome> {
    let render_job = job.render_job()?;
    let outcome = renderer.render(&render_job).await?;
    info!(
        exit_code = outcome.exit_code,
        output = %job.output_dir.display(),
        "publish render finished"
    );
    Ok(outcome)
}
