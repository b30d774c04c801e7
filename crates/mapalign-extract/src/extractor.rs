//! Folding classified log lines into report rows.

use crate::{
    ContextSummary, EntityKind, ExtractError, ExtractResult, GapKind, LineClass, LineMatcher,
    LogEvent, MissingNode, RenderedEntity, ReportPaths,
};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Final classification of a term, decided by its last event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Missing,
    Resolved,
}

type RowKey = (String, String);

/// Streaming extractor. Feed lines in log order, then call [`finish`].
///
/// [`finish`]: Extractor::finish
pub struct Extractor<'m> {
    matcher: &'m dyn LineMatcher,
    line_no: usize,
    events: usize,
    context: String,
    outcomes: HashMap<String, Outcome>,
    missing: IndexMap<RowKey, MissingNode>,
    rendered: IndexMap<RowKey, RenderedEntity>,
    contexts: IndexMap<String, Option<String>>,
    gaps: HashMap<(String, GapKind), HashSet<String>>,
}

impl<'m> Extractor<'m> {
    pub fn new(matcher: &'m dyn LineMatcher) -> Self {
        Self {
            matcher,
            line_no: 0,
            events: 0,
            context: String::new(),
            outcomes: HashMap::new(),
            missing: IndexMap::new(),
            rendered: IndexMap::new(),
            contexts: IndexMap::new(),
            gaps: HashMap::new(),
        }
    }

    /// Classify and fold the next log line.
    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        match self.matcher.classify(line) {
            LineClass::Irrelevant => {}
            LineClass::Context {
                context,
                completeness,
            } => {
                let entry = self.contexts.entry(context.clone()).or_insert(None);
                if completeness.is_some() {
                    *entry = completeness;
                }
                self.context = context;
            }
            LineClass::Events(events) => {
                for event in events {
                    self.apply(event);
                }
            }
            LineClass::Gaps { kind, items } => {
                self.contexts.entry(self.context.clone()).or_insert(None);
                self.gaps
                    .entry((self.context.clone(), kind))
                    .or_default()
                    .extend(items);
            }
        }
    }

    fn apply(&mut self, event: LogEvent) {
        self.events += 1;
        let line = self.line_no;

        match event {
            LogEvent::Missing { term_id, context } => {
                let context = context.unwrap_or_else(|| self.context.clone());
                self.contexts.entry(context.clone()).or_insert(None);
                self.outcomes.insert(term_id.clone(), Outcome::Missing);

                let key = (term_id, context);
                match self.missing.get_mut(&key) {
                    Some(row) => row.line = line,
                    None => {
                        let row = MissingNode {
                            term_id: key.0.clone(),
                            context: key.1.clone(),
                            line,
                        };
                        self.missing.insert(key, row);
                    }
                }
            }
            LogEvent::Resolved {
                term_id,
                rendered_id,
                kind,
                context,
            } => {
                let context = context.unwrap_or_else(|| self.context.clone());
                self.contexts.entry(context.clone()).or_insert(None);
                self.outcomes.insert(term_id.clone(), Outcome::Resolved);

                let key = (term_id, context);
                match self.rendered.get_mut(&key) {
                    Some(row) => {
                        row.rendered_id = rendered_id;
                        row.kind = kind;
                        row.line = line;
                    }
                    None => {
                        let row = RenderedEntity {
                            term_id: key.0.clone(),
                            rendered_id,
                            kind,
                            context: key.1.clone(),
                            line,
                        };
                        self.rendered.insert(key, row);
                    }
                }
            }
        }
    }

    /// Apply last-seen-wins per term and return the reports.
    pub fn finish(self) -> Extraction {
        let outcomes = &self.outcomes;
        let missing: Vec<_> = self
            .missing
            .into_values()
            .filter(|row| outcomes.get(&row.term_id) == Some(&Outcome::Missing))
            .collect();
        let rendered: Vec<_> = self
            .rendered
            .into_values()
            .filter(|row| outcomes.get(&row.term_id) == Some(&Outcome::Resolved))
            .collect();

        let gaps = &self.gaps;
        let gap_count = |context: &str, kind: GapKind| {
            gaps.get(&(context.to_string(), kind))
                .map_or(0, HashSet::len)
        };
        let summary = self
            .contexts
            .into_iter()
            .map(|(context, completeness)| ContextSummary {
                missing: missing.iter().filter(|r| r.context == context).count(),
                rendered: rendered.iter().filter(|r| r.context == context).count(),
                missing_edges: gap_count(&context, GapKind::Edge),
                missing_segments: gap_count(&context, GapKind::Segment),
                context,
                completeness,
            })
            .collect();

        Extraction {
            missing,
            rendered,
            summary,
            lines: self.line_no,
            events: self.events,
        }
    }
}

/// Reports reduced from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Missing nodes, in first-seen order.
    pub missing: Vec<MissingNode>,
    /// Rendered entities, in first-seen order.
    pub rendered: Vec<RenderedEntity>,
    /// One entry per context seen, in first-seen order.
    pub summary: Vec<ContextSummary>,
    /// Lines read.
    pub lines: usize,
    /// Term events recognised.
    pub events: usize,
}

impl Extraction {
    /// Rendered rows of one entity kind.
    pub fn rendered_of(&self, kind: EntityKind) -> impl Iterator<Item = &RenderedEntity> {
        self.rendered.iter().filter(move |r| r.kind == kind)
    }

    /// Write the reports, replacing any previous content.
    ///
    /// The summary report is written only when `paths` names one.
    pub fn write(&self, paths: &ReportPaths) -> ExtractResult<()> {
        crate::report::write_report(&paths.missing, &self.missing)?;
        crate::report::write_report(&paths.rendered, &self.rendered)?;
        if let Some(summary) = &paths.summary {
            crate::report::write_report(summary, &self.summary)?;
        }
        Ok(())
    }
}

/// Extract reports from in-memory log text.
pub fn extract_str(text: &str, matcher: &dyn LineMatcher) -> Extraction {
    let mut extractor = Extractor::new(matcher);
    for line in text.lines() {
        extractor.feed_line(line);
    }
    extractor.finish()
}

/// Extract reports from a log file.
///
/// Invalid UTF-8 is replaced rather than rejected.
#[instrument(skip(log_path, matcher), fields(log = %log_path.as_ref().display()))]
pub fn extract(log_path: impl AsRef<Path>, matcher: &dyn LineMatcher) -> ExtractResult<Extraction> {
    let path = log_path.as_ref();
    let unreadable = |source| ExtractError::LogUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(unreadable)?;
    let mut reader = BufReader::new(file);
    let mut extractor = Extractor::new(matcher);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(unreadable)?;
        if read == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        extractor.feed_line(&String::from_utf8_lossy(&buf));
    }

    let extraction = extractor.finish();
    debug!(
        lines = extraction.lines,
        events = extraction.events,
        "log scanned"
    );
    Ok(extraction)
}

/// Extract reports from `log_path` and write them to `paths`.
pub fn extract_to_files(
    log_path: impl AsRef<Path>,
    paths: &ReportPaths,
    matcher: &dyn LineMatcher,
) -> ExtractResult<Extraction> {
    let extraction = extract(log_path, matcher)?;
    extraction.write(paths)?;
    info!(
        missing = extraction.missing.len(),
        rendered = extraction.rendered.len(),
        report = %paths.rendered.display(),
        "reports written"
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectivityMatcher, MarkerMatcher};

    fn terms_missing(e: &Extraction) -> Vec<(&str, &str)> {
        e.missing
            .iter()
            .map(|r| (r.term_id.as_str(), r.context.as_str()))
            .collect()
    }

    fn terms_rendered(e: &Extraction) -> Vec<(&str, &str)> {
        e.rendered
            .iter()
            .map(|r| (r.term_id.as_str(), r.rendered_id.as_str()))
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let e = extract_str(
            "RESOLVED foo -> node42\nMISSING bar\nsome unrelated diagnostic text\nRESOLVED bar -> node7\n",
            &MarkerMatcher::new(),
        );
        assert!(e.missing.is_empty());
        assert_eq!(terms_rendered(&e), vec![("foo", "node42"), ("bar", "node7")]);
        assert_eq!(e.lines, 4);
        assert_eq!(e.events, 3);
    }

    #[test]
    fn test_resolved_then_missing() {
        let e = extract_str("RESOLVED foo -> n1\nMISSING foo\n", &MarkerMatcher::new());
        assert!(e.rendered.is_empty());
        assert_eq!(terms_missing(&e), vec![("foo", "")]);
        assert_eq!(e.missing[0].line, 2);
    }

    #[test]
    fn test_duplicates_collapse_to_first_position() {
        let e = extract_str(
            "MISSING a\nMISSING b\nMISSING a\nRESOLVED c -> x\nRESOLVED c -> y\n",
            &MarkerMatcher::new(),
        );
        assert_eq!(terms_missing(&e), vec![("a", ""), ("b", "")]);
        assert_eq!(e.missing[0].line, 3);
        assert_eq!(terms_rendered(&e), vec![("c", "y")]);
        assert_eq!(e.rendered[0].line, 5);
    }

    #[test]
    fn test_same_term_in_two_contexts() {
        let e = extract_str(
            "MISSING a @ p1\nCONTEXT p2\nMISSING a\nMISSING a @ p1\n",
            &MarkerMatcher::new(),
        );
        assert_eq!(terms_missing(&e), vec![("a", "p1"), ("a", "p2")]);
    }

    #[test]
    fn test_last_seen_spans_contexts() {
        let e = extract_str("MISSING a @ p1\nRESOLVED a -> n @ p2\n", &MarkerMatcher::new());
        assert!(e.missing.is_empty());
        assert_eq!(e.rendered[0].context, "p2");
    }

    #[test]
    fn test_crlf_lines() {
        let e = extract_str("MISSING a\r\nMISSING b\r\n", &MarkerMatcher::new());
        assert_eq!(terms_missing(&e), vec![("a", ""), ("b", "")]);
    }

    #[test]
    fn test_connectivity_summary() {
        let log = "\
* * path-1: Partial
- - missing_nodes: [('A', ())]
- - rendered_nodes: [('B', ())]
- - rendered_edges: [(('B', ()), ('C', ()))]
- - missing_edges: [(('A', ()), ('B', ())), (('A', ()), ('D', ()))]
- - missing_segments: ['s1']
- - missing_edges: [(('A', ()), ('B', ()))]
* * path-2: Complete
- - missing_nodes: []
- - rendered_nodes: [('A', ())]
";
        let e = extract_str(log, &ConnectivityMatcher::new());

        // ('A', ()) ends resolved, so its earlier missing row is dropped.
        assert!(e.missing.is_empty());
        assert_eq!(e.rendered_of(EntityKind::Edge).count(), 1);
        assert_eq!(
            e.summary,
            vec![
                ContextSummary {
                    context: "path-1".into(),
                    completeness: Some("Partial".into()),
                    missing: 0,
                    rendered: 2,
                    missing_edges: 2,
                    missing_segments: 1,
                },
                ContextSummary {
                    context: "path-2".into(),
                    completeness: Some("Complete".into()),
                    missing: 0,
                    rendered: 1,
                    missing_edges: 0,
                    missing_segments: 0,
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let e = extract_str("", &MarkerMatcher::new());
        assert_eq!(e, Extraction::default());
    }
}
