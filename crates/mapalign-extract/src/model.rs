//! Events read from render logs and the report rows built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of rendered map entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Node,
    Edge,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }

    /// Parse `node` or `edge`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("node") {
            Some(Self::Node)
        } else if s.eq_ignore_ascii_case("edge") {
            Some(Self::Edge)
        } else {
            None
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A term resolution event recognised in one log line.
///
/// `context` is `None` when the line itself names no context; the extractor
/// then applies the most recent context line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Missing {
        term_id: String,
        context: Option<String>,
    },
    Resolved {
        term_id: String,
        rendered_id: String,
        kind: EntityKind,
        context: Option<String>,
    },
}

impl LogEvent {
    pub fn missing(term_id: impl Into<String>) -> Self {
        Self::Missing {
            term_id: term_id.into(),
            context: None,
        }
    }

    pub fn resolved(term_id: impl Into<String>, rendered_id: impl Into<String>) -> Self {
        Self::Resolved {
            term_id: term_id.into(),
            rendered_id: rendered_id.into(),
            kind: EntityKind::Node,
            context: None,
        }
    }

    /// Set the entity kind of a resolved event. No effect on missing events.
    pub fn with_kind(mut self, new_kind: EntityKind) -> Self {
        if let Self::Resolved { kind, .. } = &mut self {
            *kind = new_kind;
        }
        self
    }

    pub fn with_context(mut self, value: Option<String>) -> Self {
        match &mut self {
            Self::Missing { context, .. } | Self::Resolved { context, .. } => *context = value,
        }
        self
    }

    pub fn term_id(&self) -> &str {
        match self {
            Self::Missing { term_id, .. } | Self::Resolved { term_id, .. } => term_id,
        }
    }
}

/// Row of the missing-node report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingNode {
    pub term_id: String,
    pub context: String,
    /// 1-based log line this row traces to.
    pub line: usize,
}

/// Row of the rendered-entity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEntity {
    pub term_id: String,
    pub rendered_id: String,
    pub kind: EntityKind,
    pub context: String,
    /// 1-based log line this row traces to.
    pub line: usize,
}

/// Path elements the render tool could not route. They are not terms, so
/// they only show up as counts in the context summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    Edge,
    Segment,
}

/// Per-context tally, e.g. one neuron path of a connectivity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub context: String,
    /// Completeness reported by the render tool, when it reported one.
    pub completeness: Option<String>,
    pub missing: usize,
    pub rendered: usize,
    /// Distinct edges reported missing for this context.
    pub missing_edges: usize,
    /// Distinct segments reported missing for this context.
    pub missing_segments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!(EntityKind::parse("EDGE"), Some(EntityKind::Edge));
        assert_eq!(EntityKind::parse("node"), Some(EntityKind::Node));
        assert_eq!(EntityKind::parse("segment"), None);
    }

    #[test]
    fn test_event_builders() {
        let event = LogEvent::resolved("foo", "n1")
            .with_kind(EntityKind::Edge)
            .with_context(Some("path-1".into()));
        assert_eq!(
            event,
            LogEvent::Resolved {
                term_id: "foo".into(),
                rendered_id: "n1".into(),
                kind: EntityKind::Edge,
                context: Some("path-1".into()),
            }
        );
        assert_eq!(LogEvent::missing("bar").with_kind(EntityKind::Edge), LogEvent::missing("bar"));
    }
}
