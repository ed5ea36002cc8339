//! Thread data model, statistics, and pre-posting validation

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Separator used when exporting a thread as one copyable block.
pub const EXPORT_SEPARATOR: &str = "\n\n---\n\n";

/// Threads longer than this are flagged by [`validate_for_posting`].
pub const RECOMMENDED_MAX_CHUNKS: usize = 25;

/// One bounded-length segment of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position in the thread
    pub index: usize,
    /// Trimmed body text, numbering suffix excluded
    pub body: String,
    /// Exactly what gets posted: body plus numbering suffix
    pub rendered: String,
    /// Character count of `rendered`
    pub char_count: usize,
}

impl Chunk {
    pub(crate) fn new(index: usize, body: String, rendered: String) -> Self {
        let char_count = rendered.chars().count();
        Self {
            index,
            body,
            rendered,
            char_count,
        }
    }
}

/// The ordered chunks derived from one input text.
///
/// Regenerated wholesale on every re-chunk; chunks are never patched in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThreadSequence {
    chunks: Vec<Chunk>,
}

impl ThreadSequence {
    pub(crate) fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// All chunks in posting order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the thread has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Iterate over chunks in posting order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// Join rendered chunks with `separator` for copy or export.
    pub fn export(&self, separator: &str) -> String {
        self.chunks
            .iter()
            .map(|chunk| chunk.rendered.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Aggregate statistics over rendered chunks, `None` for an empty
    /// thread.
    pub fn stats(&self, limit: usize) -> Option<ThreadStats> {
        if self.chunks.is_empty() {
            return None;
        }
        let lengths: Vec<usize> = self.chunks.iter().map(|c| c.char_count).collect();
        let total: usize = lengths.iter().sum();
        Some(ThreadStats {
            chunk_count: lengths.len(),
            total_chars: total,
            avg_chars: total as f64 / lengths.len() as f64,
            max_chars: lengths.iter().copied().max().unwrap_or(0),
            min_chars: lengths.iter().copied().min().unwrap_or(0),
            over_limit: lengths.iter().filter(|&&len| len > limit).count(),
        })
    }
}

impl<'a> IntoIterator for &'a ThreadSequence {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Aggregate numbers over a thread's rendered chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadStats {
    /// Number of chunks in the thread
    pub chunk_count: usize,
    /// Sum of rendered character counts
    pub total_chars: usize,
    /// Mean rendered character count
    pub avg_chars: f64,
    /// Longest rendered chunk
    pub max_chars: usize,
    /// Shortest rendered chunk
    pub min_chars: usize,
    /// Chunks whose rendered text exceeds the limit; nonzero only when
    /// the numbering suffix is configured not to count
    pub over_limit: usize,
}

/// Check a thread against posting constraints.
///
/// Returns one message per violation; an empty list means the thread is
/// safe to hand to the sequencer.
pub fn validate_for_posting(
    thread: &ThreadSequence,
    limit: usize,
    max_chunks: usize,
) -> Vec<String> {
    let mut problems = Vec::new();
    if thread.is_empty() {
        problems.push("no chunks to post".to_string());
        return problems;
    }
    if thread.len() > max_chunks {
        problems.push(format!(
            "thread has {} chunks, more than the recommended maximum of {max_chunks}",
            thread.len()
        ));
    }
    for chunk in thread {
        if chunk.char_count > limit {
            problems.push(format!(
                "chunk {} is {} characters, over the {limit} limit",
                chunk.index + 1,
                chunk.char_count
            ));
        }
        if chunk.rendered.trim().is_empty() {
            problems.push(format!("chunk {} is empty", chunk.index + 1));
        }
    }
    problems
}

/// Human-readable estimate of how long posting will take at a given
/// inter-post delay.
pub fn estimate_posting_time(chunk_count: usize, delay: Duration) -> String {
    let total = delay.as_secs().saturating_mul(chunk_count as u64);
    if total < 60 {
        format!("{total} seconds")
    } else if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }
}
