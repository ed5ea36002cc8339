//! Markdown output formatter

use std::io::Write;

use anyhow::Result;
use spool_core::{Chunk, ThreadStats};

use super::ThreadFormatter;

/// Markdown preview: a heading per chunk with its character usage and a
/// fenced body, the way a reviewer would want to eyeball a thread.
pub struct MarkdownFormatter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> ThreadFormatter for MarkdownFormatter<W> {
    fn write_chunk(&mut self, chunk: &Chunk, total: usize) -> Result<()> {
        writeln!(
            self.writer,
            "**Post {}/{}** ({} chars)",
            chunk.index + 1,
            total,
            chunk.char_count
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "```text")?;
        writeln!(self.writer, "{}", chunk.rendered)?;
        writeln!(self.writer, "```")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self, stats: Option<&ThreadStats>) -> Result<()> {
        if let Some(stats) = stats {
            writeln!(self.writer, "---")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "- chunks: {}", stats.chunk_count)?;
            writeln!(self.writer, "- total characters: {}", stats.total_chars)?;
            writeln!(self.writer, "- longest: {}", stats.max_chars)?;
            writeln!(self.writer, "- shortest: {}", stats.min_chars)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
