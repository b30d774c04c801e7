//! Result printing.

use mapalign_pipeline::{ExtractionStatus, FetchStatus, PipelineReport, RenderStatus};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Print `value` as JSON, or through `text` in text mode.
pub fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

/// One line per repository and per target.
pub fn report_text(report: &PipelineReport) -> String {
    let mut out = String::new();
    for repo in &report.repositories {
        let status = match &repo.status {
            FetchStatus::Fetched { cloned: true, head } => format!("cloned at {}", short(head)),
            FetchStatus::Fetched { cloned: false, head } => format!("ready at {}", short(head)),
            FetchStatus::Failed { error } => format!("FAILED: {error}"),
        };
        out.push_str(&format!("fetch  {:<16} {status}\n", repo.name));
    }
    for target in &report.targets {
        let render = match &target.render {
            RenderStatus::Succeeded { duration_ms } => format!("ok ({duration_ms} ms)"),
            RenderStatus::Failed {
                timed_out: true, ..
            } => "timed out".to_string(),
            RenderStatus::Failed { exit_code, .. } => format!("exit {exit_code}"),
            RenderStatus::Error { error } => format!("error: {error}"),
            RenderStatus::FetchFailed { repository } => format!("skipped ({repository} unavailable)"),
        };
        let extraction = match &target.extraction {
            ExtractionStatus::Written { missing, rendered } => {
                format!("{missing} missing, {rendered} rendered")
            }
            ExtractionStatus::Failed { error } => format!("error: {error}"),
            ExtractionStatus::Skipped => "skipped".to_string(),
        };
        out.push_str(&format!(
            "target {:<16} render {render}; reports {extraction}\n",
            target.name
        ));
    }
    out
}

pub(crate) fn short(head: &str) -> &str {
    head.get(..7).unwrap_or(head)
}
