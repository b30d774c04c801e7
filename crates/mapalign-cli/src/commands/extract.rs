//! Extract command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};
use mapalign_common_config::Grammar;
use mapalign_extract::{build_matcher, extract_to_files, ReportPaths};
use serde::Serialize;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output;

/// Reduce one render log to missing and rendered reports
#[derive(Debug, Parser)]
pub struct ExtractCommand {
    /// Render log to read
    #[arg(long, alias = "log_file", value_hint = ValueHint::FilePath)]
    pub log_file: PathBuf,

    /// Destination of the missing-node report
    #[arg(long, alias = "missing_file", value_hint = ValueHint::FilePath)]
    pub missing_file: PathBuf,

    /// Destination of the rendered-entity report
    #[arg(long, alias = "rendered_file", value_hint = ValueHint::FilePath)]
    pub rendered_file: PathBuf,

    /// Optional per-context summary report
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub summary_file: Option<PathBuf>,

    /// Log grammar, overriding the configuration
    #[arg(long, value_enum)]
    pub grammar: Option<GrammarArg>,
}

/// Log grammar selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrammarArg {
    Marker,
    Connectivity,
    Pattern,
}

impl From<GrammarArg> for Grammar {
    fn from(arg: GrammarArg) -> Self {
        match arg {
            GrammarArg::Marker => Grammar::Marker,
            GrammarArg::Connectivity => Grammar::Connectivity,
            GrammarArg::Pattern => Grammar::Pattern,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExtractSummary {
    lines: usize,
    missing: usize,
    rendered: usize,
}

impl ExtractCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut matcher_config = ctx.config.matcher.clone();
        if let Some(grammar) = self.grammar {
            matcher_config.grammar = grammar.into();
        }
        let matcher = build_matcher(&matcher_config)?;

        let mut paths = ReportPaths::new(&self.missing_file, &self.rendered_file);
        if let Some(summary) = &self.summary_file {
            paths = paths.with_summary(summary);
        }

        let extraction = extract_to_files(&self.log_file, &paths, matcher.as_ref())?;
        let summary = ExtractSummary {
            lines: extraction.lines,
            missing: extraction.missing.len(),
            rendered: extraction.rendered.len(),
        };
        output::emit(ctx.format, &summary, |s| {
            format!(
                "{} lines: {} missing, {} rendered\n",
                s.lines, s.missing, s.rendered
            )
        })
    }
}
