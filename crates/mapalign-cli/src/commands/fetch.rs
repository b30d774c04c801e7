//! Fetch command implementation.

use clap::Parser;
use mapalign_git::{FetchRequest, GitFetcher, SourceFetcher};
use serde::Serialize;
use tracing::error;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output;

/// Clone missing source repositories and switch them to their branch
#[derive(Debug, Parser)]
pub struct FetchCommand {
    /// Only fetch the named repository (repeatable)
    #[arg(short, long = "repository", value_name = "NAME")]
    pub repositories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Fetched {
    name: String,
    branch: String,
    cloned: bool,
    head: String,
}

impl FetchCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let selected: Vec<_> = if self.repositories.is_empty() {
            ctx.config.repositories.iter().collect()
        } else {
            self.repositories
                .iter()
                .map(|name| {
                    ctx.config
                        .repository(name)
                        .ok_or_else(|| CliError::validation(format!("unknown repository: {name}")))
                })
                .collect::<Result<_, _>>()?
        };

        let fetcher = GitFetcher::new();
        let mut fetched = Vec::new();
        let mut first_error = None;

        for repo in selected {
            let request = FetchRequest {
                name: repo.name.clone(),
                url: repo.url.clone(),
                path: repo.path.clone(),
                branch: repo.branch.clone(),
            };
            match fetcher.fetch(&request) {
                Ok(outcome) => fetched.push(Fetched {
                    name: outcome.name,
                    branch: outcome.branch,
                    cloned: outcome.cloned,
                    head: outcome.head.to_hex(),
                }),
                Err(e) => {
                    error!(repository = %repo.name, error = %e, "fetch failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        output::emit(ctx.format, &fetched, |list| {
            list.iter()
                .map(|f| {
                    let action = if f.cloned { "cloned" } else { "ready" };
                    format!("{:<16} {action} on {} at {}\n", f.name, f.branch, output::short(&f.head))
                })
                .collect()
        })?;

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
