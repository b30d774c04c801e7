//! Render runner for mapalign.
//!
//! Drives the external flatmap maker: one subprocess per [`RenderJob`], with
//! its diagnostic output captured into a per-target log file that the
//! extractor reads afterwards.

pub mod error;
pub mod job;
pub mod logdir;
pub mod runner;

pub use error::{RenderError, RenderResult};
pub use job::{LogCapture, RenderJob, RenderTool};
pub use logdir::{LogDirectory, ResetSummary};
pub use runner::{ProcessRenderer, RenderOutcome, Renderer};
