//! CSV report output.

use crate::{ContextSummary, ExtractError, ExtractResult, MissingNode, RenderedEntity};
use mapalign_common_config::TargetConfig;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destinations of one target's reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub missing: PathBuf,
    pub rendered: PathBuf,
    pub summary: Option<PathBuf>,
}

impl ReportPaths {
    pub fn new(missing: impl Into<PathBuf>, rendered: impl Into<PathBuf>) -> Self {
        Self {
            missing: missing.into(),
            rendered: rendered.into(),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<PathBuf>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Delete every report that exists. Missing files are not an error.
    pub fn remove(&self) -> ExtractResult<()> {
        let paths = [Some(&self.missing), Some(&self.rendered), self.summary.as_ref()];
        for path in paths.into_iter().flatten() {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(ExtractError::ReportWrite {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }
}

impl From<&TargetConfig> for ReportPaths {
    fn from(target: &TargetConfig) -> Self {
        Self {
            missing: target.missing_report.clone(),
            rendered: target.rendered_report.clone(),
            summary: target.summary_report.clone(),
        }
    }
}

/// A type written as one CSV row.
pub trait ReportRow {
    /// Column names.
    const HEADER: &'static [&'static str];

    /// Field values, in header order.
    fn fields(&self) -> Vec<Cow<'_, str>>;
}

impl ReportRow for MissingNode {
    const HEADER: &'static [&'static str] = &["term_id", "context"];

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![self.term_id.as_str().into(), self.context.as_str().into()]
    }
}

impl ReportRow for RenderedEntity {
    const HEADER: &'static [&'static str] = &["term_id", "rendered_id", "kind", "context"];

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.term_id.as_str().into(),
            self.rendered_id.as_str().into(),
            self.kind.as_str().into(),
            self.context.as_str().into(),
        ]
    }
}

impl ReportRow for ContextSummary {
    const HEADER: &'static [&'static str] = &[
        "context",
        "completeness",
        "missing",
        "rendered",
        "missing_edges",
        "missing_segments",
    ];

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.context.as_str().into(),
            self.completeness.as_deref().unwrap_or_default().into(),
            self.missing.to_string().into(),
            self.rendered.to_string().into(),
            self.missing_edges.to_string().into(),
            self.missing_segments.to_string().into(),
        ]
    }
}

/// Minimal RFC 4180 writer.
pub struct CsvWriter<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    pub fn write_header<R: ReportRow>(&mut self) -> std::io::Result<()> {
        self.write_record(R::HEADER.iter().copied())
    }

    pub fn write_row<R: ReportRow>(&mut self, row: &R) -> std::io::Result<()> {
        let fields = row.fields();
        self.write_record(fields.iter().map(|f| f.as_ref()))
    }

    fn write_record<'a>(&mut self, fields: impl Iterator<Item = &'a str>) -> std::io::Result<()> {
        let mut line = String::new();
        for (i, field) in fields.enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&escape(field));
        }
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.bytes_written += line.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Quote a field when it holds a delimiter, quote or line break.
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Replace `path` with a header line followed by `rows`.
pub(crate) fn write_report<R: ReportRow>(path: &Path, rows: &[R]) -> ExtractResult<()> {
    let failed = |source| ExtractError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(failed)?;
    }
    let file = File::create(path).map_err(failed)?;
    let mut csv = CsvWriter::new(BufWriter::new(file));

    csv.write_header::<R>().map_err(failed)?;
    for row in rows {
        csv.write_row(row).map_err(failed)?;
    }
    csv.flush().map_err(failed)
}
