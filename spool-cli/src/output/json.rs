//! JSON output formatter

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use spool_core::{Chunk, ThreadStats};

use super::ThreadFormatter;

/// Buffers chunks and emits one JSON document on `finish`.
pub struct JsonFormatter<W: Write> {
    writer: W,
    chunks: Vec<ChunkData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct ChunkData {
    /// 0-based chunk position
    pub index: usize,
    /// Rendered chunk text, suffix included
    pub text: String,
    /// Character count of `text`
    pub character_count: usize,
}

#[derive(Debug, Serialize)]
struct ThreadDocument<'a> {
    chunks: &'a [ChunkData],
    stats: &'a ThreadStats,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunks: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> ThreadFormatter for JsonFormatter<W> {
    fn write_chunk(&mut self, chunk: &Chunk, _total: usize) -> Result<()> {
        self.chunks.push(ChunkData {
            index: chunk.index,
            text: chunk.rendered.clone(),
            character_count: chunk.char_count,
        });
        Ok(())
    }

    fn finish(&mut self, stats: Option<&ThreadStats>) -> Result<()> {
        match stats {
            Some(stats) => serde_json::to_writer_pretty(
                &mut self.writer,
                &ThreadDocument {
                    chunks: &self.chunks,
                    stats,
                },
            )?,
            None => serde_json::to_writer_pretty(&mut self.writer, &self.chunks)?,
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
