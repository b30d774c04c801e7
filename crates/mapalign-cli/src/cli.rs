//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use mapalign_common_config::{vars, ConfigLoader, MapalignConfig};

use crate::commands::{AlignCommand, ConfigCommand, ExtractCommand, FetchCommand, PublishCommand};
use crate::error::CliError;

/// mapalign - align anatomical terms with rendered flatmaps
///
/// Renders flatmap manifests with mapmaker and reduces the render logs to
/// reports of missing and rendered terms.
#[derive(Debug, Parser)]
#[command(
    name = "mapalign",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::MAPALIGN_CONFIG,
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch sources, render every target and write its reports
    Align(AlignCommand),

    /// Reduce one render log to missing and rendered reports
    Extract(ExtractCommand),

    /// Clone or update the source repositories
    Fetch(FetchCommand),

    /// Render the publish manifest with background tiles
    Publish(PublishCommand),

    /// Show the effective configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Load configuration from `--config` or `.mapalign/config.yaml`.
    pub fn load_config(&self) -> Result<MapalignConfig, CliError> {
        let loader = match &self.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new("."),
        };
        loader.load().map_err(CliError::from)
    }

    /// Execute the selected command
    pub async fn execute(self, config: MapalignConfig) -> Result<(), CliError> {
        let ctx = CommandContext {
            config,
            format: self.format,
        };

        match self.command {
            Command::Align(cmd) => cmd.execute(&ctx).await,
            Command::Extract(cmd) => cmd.execute(&ctx),
            Command::Fetch(cmd) => cmd.execute(&ctx),
            Command::Publish(cmd) => cmd.execute(&ctx).await,
            Command::Config(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: MapalignConfig,
    pub format: OutputFormat,
}
