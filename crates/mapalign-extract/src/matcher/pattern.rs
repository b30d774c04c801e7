//! User-supplied regular expression grammar.

use super::{LineClass, LineMatcher};
use crate::{EntityKind, ExtractError, ExtractResult, LogEvent};
use mapalign_common_config::MatcherConfig;
use regex::{Captures, Regex};

/// Matches lines against configured regexes.
///
/// Resolved patterns need named groups `term` and `rendered`; missing
/// patterns need `term`; context patterns need `context`. Resolved and
/// missing patterns may also capture `context`, and resolved patterns
/// `kind` (`node` or `edge`). Patterns are tried resolved first, then
/// missing, then context; within a list, in configured order.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    resolved: Vec<Regex>,
    missing: Vec<Regex>,
    context: Vec<Regex>,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MatcherConfig) -> ExtractResult<Self> {
        let mut matcher = Self::new();
        for pattern in &config.resolved {
            matcher = matcher.resolved(pattern)?;
        }
        for pattern in &config.missing {
            matcher = matcher.missing(pattern)?;
        }
        for pattern in &config.context {
            matcher = matcher.context(pattern)?;
        }
        Ok(matcher)
    }

    pub fn resolved(mut self, pattern: &str) -> ExtractResult<Self> {
        self.resolved
            .push(compile("resolved", pattern, &["term", "rendered"])?);
        Ok(self)
    }

    pub fn missing(mut self, pattern: &str) -> ExtractResult<Self> {
        self.missing.push(compile("missing", pattern, &["term"])?);
        Ok(self)
    }

    pub fn context(mut self, pattern: &str) -> ExtractResult<Self> {
        self.context.push(compile("context", pattern, &["context"])?);
        Ok(self)
    }
}

fn compile(role: &'static str, pattern: &str, required: &[&str]) -> ExtractResult<Regex> {
    let invalid = |message: String| ExtractError::InvalidPattern {
        role,
        pattern: pattern.to_string(),
        message,
    };

    let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
    let names: Vec<_> = regex.capture_names().flatten().collect();
    for group in required {
        if !names.contains(group) {
            return Err(invalid(format!("missing named group `{group}`")));
        }
    }
    Ok(regex)
}

/// Non-empty trimmed text of a named group.
fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

impl LineMatcher for PatternMatcher {
    fn classify(&self, line: &str) -> LineClass {
        for regex in &self.resolved {
            let Some(caps) = regex.captures(line) else {
                continue;
            };
            let (Some(term), Some(rendered)) = (group(&caps, "term"), group(&caps, "rendered"))
            else {
                continue;
            };
            let kind = match group(&caps, "kind") {
                Some(text) => match EntityKind::parse(text) {
                    Some(kind) => kind,
                    None => continue,
                },
                None => EntityKind::Node,
            };
            return LineClass::event(
                LogEvent::resolved(term, rendered)
                    .with_kind(kind)
                    .with_context(group(&caps, "context").map(String::from)),
            );
        }

        for regex in &self.missing {
            let Some(caps) = regex.captures(line) else {
                continue;
            };
            if let Some(term) = group(&caps, "term") {
                return LineClass::event(
                    LogEvent::missing(term).with_context(group(&caps, "context").map(String::from)),
                );
            }
        }

        for regex in &self.context {
            if let Some(context) = regex.captures(line).and_then(|caps| group(&caps, "context")) {
                return LineClass::context(context);
            }
        }

        LineClass::Irrelevant
    }
}
