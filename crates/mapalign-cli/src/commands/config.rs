//! Config command implementation.

use clap::Parser;
use mapalign_common_config::to_yaml;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output;

/// Show the effective configuration (defaults merged with the config file)
#[derive(Debug, Parser)]
pub struct ConfigCommand {}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let yaml = to_yaml(&ctx.config)?;
        output::emit(ctx.format, &ctx.config, |_| yaml)
    }
}
