//! Configuration for the mapalign pipeline.
//!
//! The configuration lives in `.mapalign/config.yaml` under the project
//! directory. Every section has defaults matching the reference alignment
//! run, so the file is optional.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
