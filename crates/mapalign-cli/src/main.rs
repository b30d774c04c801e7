//! mapalign - flatmap term alignment
//!
//! Main entry point for the `mapalign` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mapalign_cli::cli::Cli;
use mapalign_cli::CliError;
use mapalign_common_config::Environment;
use mapalign_common_log::{LogConfig, LogLevel};
use tracing::{debug, error, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = Environment::init();
    init_logging(&cli);
    match env {
        Ok(env) => {
            for file in env.loaded() {
                debug!(file = %file.display(), "loaded environment file");
            }
        }
        Err(e) => warn!("{e}"),
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async {
        let config = cli.load_config()?;
        cli.execute(config).await
    })
}

fn init_logging(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose > 0 || cli.quiet {
        config = config.with_level(LogLevel::from_verbosity(cli.verbose, cli.quiet));
    }
    if let Err(e) = mapalign_common_log::init(config) {
        eprintln!("warning: {e}");
    }
}
