//! Output formatting for chunked threads

use anyhow::Result;
use spool_core::{Chunk, ThreadStats};

/// Trait for thread output formatters
pub trait ThreadFormatter: Send + Sync {
    /// Write a single chunk
    fn write_chunk(&mut self, chunk: &Chunk, total: usize) -> Result<()>;

    /// Finalize output (close arrays, append statistics)
    fn finish(&mut self, stats: Option<&ThreadStats>) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
