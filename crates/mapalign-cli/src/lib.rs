//! mapalign CLI library.
//!
//! Core library components for the `mapalign` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
