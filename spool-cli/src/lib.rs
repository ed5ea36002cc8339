//! Library side of the spool CLI
//!
//! Argument types, input loading, and output formatting live here so
//! they stay unit-testable; `main.rs` only parses and dispatches.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;

pub use error::{CliError, CliResult};
