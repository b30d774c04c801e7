//! mapmaker connectivity diagnostics.

use super::literal::{balanced_end, split_collection};
use super::{LineClass, LineMatcher};
use crate::{EntityKind, GapKind, LogEvent};

const FEATURE_NOT_FOUND: &str = "Cannot find feature for connectivity node ";
const PATH_HEADER: &str = "* * ";
const PATH_FEATURE: &str = "- - ";

/// Understands the diagnostics mapmaker writes while routing neuron paths.
///
/// ```text
/// Cannot find feature for connectivity node ('UBERON:1', ()) (label)
/// * * ilxtr:neuron-type-1: Partial
/// - - missing_nodes: [('UBERON:1', ())]
/// - - rendered_nodes: [('UBERON:2', ())]
/// - - rendered_edges: [(('UBERON:2', ()), ('UBERON:3', ()))]
/// ```
///
/// A `* *` header names the neuron path used as context for the `- -`
/// feature lines after it. Nodes and edges are identified by their literal
/// text. Missing edges and segments are not terms; they are reported as
/// [`LineClass::Gaps`]. Other feature names are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityMatcher;

impl ConnectivityMatcher {
    pub fn new() -> Self {
        Self
    }

    fn feature_line(rest: &str) -> LineClass {
        let Some((feature, value)) = rest.split_once(": ") else {
            return LineClass::Irrelevant;
        };
        let Some(elements) = split_collection(value) else {
            return LineClass::Irrelevant;
        };

        let events = match feature.trim() {
            "missing_nodes" => elements.into_iter().map(LogEvent::missing).collect(),
            "rendered_nodes" => elements
                .into_iter()
                .map(|node| LogEvent::resolved(node, node))
                .collect(),
            "rendered_edges" => {
                if elements.iter().any(|e| !is_edge(e)) {
                    return LineClass::Irrelevant;
                }
                elements
                    .into_iter()
                    .map(|edge| LogEvent::resolved(edge, edge).with_kind(EntityKind::Edge))
                    .collect()
            }
            "missing_edges" => {
                if elements.iter().any(|e| !is_edge(e)) {
                    return LineClass::Irrelevant;
                }
                return LineClass::Gaps {
                    kind: GapKind::Edge,
                    items: elements.into_iter().map(String::from).collect(),
                };
            }
            "missing_segments" => {
                return LineClass::Gaps {
                    kind: GapKind::Segment,
                    items: elements.into_iter().map(String::from).collect(),
                }
            }
            _ => return LineClass::Irrelevant,
        };
        LineClass::Events(events)
    }

    fn path_header(rest: &str) -> LineClass {
        match rest.split_once(": ") {
            Some((path, completeness)) if !path.trim().is_empty() => LineClass::Context {
                context: path.trim().to_string(),
                completeness: Some(completeness.trim().to_string()).filter(|c| !c.is_empty()),
            },
            _ => LineClass::Irrelevant,
        }
    }
}

/// An edge literal is a pair of nodes.
fn is_edge(text: &str) -> bool {
    text.starts_with('(') && split_collection(text).is_some_and(|nodes| nodes.len() == 2)
}

impl LineMatcher for ConnectivityMatcher {
    fn classify(&self, line: &str) -> LineClass {
        if let Some(pos) = line.find(FEATURE_NOT_FOUND) {
            let rest = line[pos + FEATURE_NOT_FOUND.len()..].trim_start();
            return match balanced_end(rest) {
                Some(end) => LineClass::event(LogEvent::missing(&rest[..end])),
                None => LineClass::Irrelevant,
            };
        }
        if let Some(pos) = line.find(PATH_FEATURE) {
            return Self::feature_line(&line[pos + PATH_FEATURE.len()..]);
        }
        if let Some(pos) = line.find(PATH_HEADER) {
            return Self::path_header(&line[pos + PATH_HEADER.len()..]);
        }
        LineClass::Irrelevant
    }
}
