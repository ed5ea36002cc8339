//! Plain text formatter

use std::io::Write;

use anyhow::Result;
use spool_core::{Chunk, ThreadStats};

use super::ThreadFormatter;

/// Writes rendered chunks joined by a separator, ready to copy.
pub struct TextFormatter<W: Write> {
    writer: W,
    separator: String,
    written: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, separator: impl Into<String>) -> Self {
        Self {
            writer,
            separator: separator.into(),
            written: 0,
        }
    }
}

impl<W: Write + Send + Sync> ThreadFormatter for TextFormatter<W> {
    fn write_chunk(&mut self, chunk: &Chunk, _total: usize) -> Result<()> {
        if self.written > 0 {
            write!(self.writer, "{}", self.separator)?;
        }
        write!(self.writer, "{}", chunk.rendered)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self, stats: Option<&ThreadStats>) -> Result<()> {
        writeln!(self.writer)?;
        if let Some(stats) = stats {
            writeln!(self.writer)?;
            writeln!(self.writer, "chunks: {}", stats.chunk_count)?;
            writeln!(
                self.writer,
                "characters: {} total, {:.1} avg, {} max, {} min",
                stats.total_chars, stats.avg_chars, stats.max_chars, stats.min_chars
            )?;
            if stats.over_limit > 0 {
                writeln!(self.writer, "over limit: {}", stats.over_limit)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
