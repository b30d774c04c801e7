//! Line classification.
//!
//! The render tool's log format is not pinned, so the grammar is pluggable.
//! Every matcher must treat unknown or partially matching lines as
//! [`LineClass::Irrelevant`].

mod connectivity;
mod literal;
mod marker;
mod pattern;

pub use connectivity::ConnectivityMatcher;
pub use marker::MarkerMatcher;
pub use pattern::PatternMatcher;

use crate::{ExtractResult, GapKind, LogEvent};
use mapalign_common_config::{Grammar, MatcherConfig};

/// How one log line was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Chatter, or anything not understood.
    Irrelevant,
    /// Switches the context applied to later events.
    Context {
        context: String,
        completeness: Option<String>,
    },
    /// One or more term events.
    Events(Vec<LogEvent>),
    /// Unrouted edges or segments of the current context.
    Gaps { kind: GapKind, items: Vec<String> },
}

impl LineClass {
    pub fn context(name: impl Into<String>) -> Self {
        Self::Context {
            context: name.into(),
            completeness: None,
        }
    }

    pub fn event(event: LogEvent) -> Self {
        Self::Events(vec![event])
    }
}

/// Classifies single log lines.
pub trait LineMatcher: Send + Sync {
    /// Classify `line` (without its trailing newline).
    fn classify(&self, line: &str) -> LineClass;
}

/// Build the matcher selected by configuration.
pub fn build_matcher(config: &MatcherConfig) -> ExtractResult<Box<dyn LineMatcher>> {
    Ok(match config.grammar {
        Grammar::Marker => Box::new(MarkerMatcher::new()),
        Grammar::Connectivity => Box::new(ConnectivityMatcher::new()),
        Grammar::Pattern => Box::new(PatternMatcher::from_config(config)?),
    })
}
