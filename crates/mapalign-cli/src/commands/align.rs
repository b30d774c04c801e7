//! Align command implementation.

use clap::Parser;
use mapalign_pipeline::Pipeline;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output;

/// Fetch sources, then render and extract every target in order
#[derive(Debug, Parser)]
pub struct AlignCommand {
    /// Only process the named target (repeatable)
    #[arg(short, long = "target", value_name = "NAME")]
    pub targets: Vec<String>,
}

impl AlignCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut config = ctx.config.clone();
        if !self.targets.is_empty() {
            if let Some(unknown) = self.targets.iter().find(|n| config.target(n).is_none()) {
                return Err(CliError::validation(format!("unknown target: {unknown}")));
            }
            config.targets.retain(|t| self.targets.contains(&t.name));
        }

        let report = Pipeline::from_config(config)?.run().await?;
        output::emit(ctx.format, &report, output::report_text)?;

        if report.succeeded() {
            Ok(())
        } else {
            Err(CliError::TargetsFailed {
                failed: report
                    .failed_targets()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
        }
    }
}
