//! Subcommand implementations.

mod align;
mod config;
mod extract;
mod fetch;
mod publish;

pub use align::AlignCommand;
pub use config::ConfigCommand;
pub use extract::{ExtractCommand, GrammarArg};
pub use fetch::FetchCommand;
pub use publish::PublishCommand;
