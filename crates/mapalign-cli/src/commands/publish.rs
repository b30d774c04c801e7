//! Publish command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mapalign_pipeline::{publish, PublishJob};
use mapalign_render::{ProcessRenderer, RenderTool};

use crate::cli::CommandContext;
use crate::error::CliError;

/// Render the publish manifest once, with the SciCrunch key from the environment
#[derive(Debug, Parser)]
pub struct PublishCommand {
    /// Manifest path or URL
    #[arg(long)]
    pub manifest: Option<String>,

    /// Output directory
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

impl PublishCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut job = PublishJob::from_config(&ctx.config.publish);
        if let Some(manifest) = &self.manifest {
            job.manifest = manifest.clone();
        }
        if let Some(output) = &self.output {
            job.output_dir = output.clone();
        }

        let renderer = ProcessRenderer::new(RenderTool::from(&ctx.config.render));
        let outcome = publish(&renderer, &job).await?;

        if outcome.success() {
            Ok(())
        } else {
            Err(CliError::RenderFailed {
                exit_code: outcome.exit_code,
            })
        }
    }
}
