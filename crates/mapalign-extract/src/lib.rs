//! Log report extraction for mapalign.
//!
//! A render log is read line by line. Each line is classified by a
//! [`LineMatcher`]; recognised events are folded into two deduplicated,
//! insertion-ordered collections which are then written as CSV reports:
//!
//! * missing nodes: terms the render tool could not place on the map
//! * rendered entities: terms resolved to a rendered node or edge
//!
//! When a term is reported both ways, the last event in the log wins.
//!
//! ```
//! use mapalign_extract::{extract_str, MarkerMatcher};
//!
//! let log = "RESOLVED foo -> node42\nMISSING bar\nnoise\nRESOLVED bar -> node7\n";
//! let extraction = extract_str(log, &MarkerMatcher::new());
//!
//! assert!(extraction.missing.is_empty());
//! let rendered: Vec<_> = extraction
//!     .rendered
//!     .iter()
//!     .map(|r| (r.term_id.as_str(), r.rendered_id.as_str()))
//!     .collect();
//! assert_eq!(rendered, [("foo", "node42"), ("bar", "node7")]);
//! ```

pub mod error;
pub mod extractor;
pub mod matcher;
pub mod model;
pub mod report;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{extract, extract_str, extract_to_files, Extraction, Extractor};
pub use matcher::{
    build_matcher, ConnectivityMatcher, LineClass, LineMatcher, MarkerMatcher, PatternMatcher,
};
pub use model::{ContextSummary, EntityKind, GapKind, LogEvent, MissingNode, RenderedEntity};
pub use report::{CsvWriter, ReportPaths, ReportRow};
