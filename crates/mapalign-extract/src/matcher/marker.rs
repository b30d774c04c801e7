//! `RESOLVED` / `MISSING` marker grammar.

use super::{LineClass, LineMatcher};
use crate::{EntityKind, LogEvent};
use once_cell::sync::Lazy;
use regex::Regex;

static RESOLVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bRESOLVED\s+(?P<term>\S+)\s+->\s+(?P<rendered>\S+)(?:\s+\[(?P<kind>(?i:node|edge))\])?(?:\s+@\s+(?P<context>\S.*?))?\s*$",
    )
    .expect("static regex")
});

static MISSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bMISSING\s+(?P<term>\S+)(?:\s+@\s+(?P<context>\S.*?))?\s*$")
        .expect("static regex")
});

static CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bCONTEXT\s+(?P<context>\S.*?)\s*$").expect("static regex"));

/// Matches marker lines anywhere after a timestamp or level prefix:
///
/// ```text
/// RESOLVED <term> -> <rendered> [edge] @ <context>
/// MISSING <term> @ <context>
/// CONTEXT <context>
/// ```
///
/// The kind and context suffixes are optional. Trailing text that fits
/// neither suffix makes the line irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerMatcher;

impl MarkerMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl LineMatcher for MarkerMatcher {
    fn classify(&self, line: &str) -> LineClass {
        if let Some(caps) = RESOLVED.captures(line) {
            let kind = caps
                .name("kind")
                .and_then(|k| EntityKind::parse(k.as_str()))
                .unwrap_or_default();
            return LineClass::event(
                LogEvent::resolved(&caps["term"], &caps["rendered"])
                    .with_kind(kind)
                    .with_context(caps.name("context").map(|c| c.as_str().to_string())),
            );
        }
        if let Some(caps) = MISSING.captures(line) {
            return LineClass::event(
                LogEvent::missing(&caps["term"])
                    .with_context(caps.name("context").map(|c| c.as_str().to_string())),
            );
        }
        if let Some(caps) = CONTEXT.captures(line) {
            return LineClass::context(&caps["context"]);
        }
        LineClass::Irrelevant
    }
}
