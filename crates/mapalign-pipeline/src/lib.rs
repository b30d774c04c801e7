//! Alignment pipeline for mapalign.
//!
//! Fetches each source repository once, resets the shared log directory,
//! then renders and extracts every target strictly in order. Failures are
//! isolated per target; the [`PipelineReport`] records what happened.

pub mod error;
pub mod pipeline;
pub mod publish;
pub mod report;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::Pipeline;
pub use publish::{publish, PublishJob};
pub use report::{ExtractionStatus, FetchAttempt, FetchStatus, PipelineReport, RenderStatus, TargetAttempt};
