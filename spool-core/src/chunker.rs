//! Word-boundary chunking with numbering fixed-point resolution

use crate::error::ChunkError;
use crate::numbering::NumberingTemplate;
use crate::thread::{Chunk, ThreadSequence};

/// Single-post character limit on the target platform.
pub const POST_CHAR_LIMIT: usize = 280;

/// The numbering width depends on the chunk count, which depends on the
/// numbering width. Width only changes when the count gains a digit, so
/// the fixed point settles in a handful of rounds; the bound guards the
/// loop regardless.
const MAX_NUMBERING_ROUNDS: usize = 8;

/// Chunking configuration.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum characters per rendered chunk
    pub limit: usize,
    /// Numbering suffix template
    pub template: NumberingTemplate,
    /// Whether the suffix and its separating space count against
    /// `limit`
    pub suffix_counts: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            limit: POST_CHAR_LIMIT,
            template: NumberingTemplate::default(),
            suffix_counts: true,
        }
    }
}

/// Splits raw text into a numbered thread.
///
/// Stateless apart from its configuration; a single chunker may be
/// shared freely across threads and calls.
#[derive(Debug, Clone)]
pub struct ThreadChunker {
    config: ChunkConfig,
}

impl ThreadChunker {
    /// Create a chunker, rejecting configurations that can never fit
    /// text.
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        if config.limit == 0 {
            return Err(ChunkError::LimitTooSmall {
                limit: 0,
                reserve: 0,
            });
        }
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk `text` into a numbered thread.
    ///
    /// Whitespace-only input yields an empty thread. Interior
    /// whitespace runs are preserved verbatim; chunk bodies are trimmed
    /// at their edges by construction (they start and end on words).
    pub fn chunk(&self, text: &str) -> Result<ThreadSequence, ChunkError> {
        if text.trim().is_empty() {
            return Ok(ThreadSequence::default());
        }
        let words = word_spans(text);

        let mut assumed = layout(text, &words, self.effective_limit(1)?).len();
        for _ in 0..MAX_NUMBERING_ROUNDS {
            let spans = layout(text, &words, self.effective_limit(assumed)?);
            if spans.len() == assumed {
                return Ok(self.assemble(text, &spans));
            }
            assumed = spans.len();
        }
        Err(ChunkError::Unconverged(MAX_NUMBERING_ROUNDS))
    }

    /// Characters available for body text when the thread is assumed to
    /// have `assumed` chunks.
    fn effective_limit(&self, assumed: usize) -> Result<usize, ChunkError> {
        let reserve = if assumed >= 2 && self.config.suffix_counts {
            // One space separates body from suffix.
            self.config.template.width_for(assumed) + 1
        } else {
            0
        };
        self.config
            .limit
            .checked_sub(reserve)
            .filter(|effective| *effective >= 1)
            .ok_or(ChunkError::LimitTooSmall {
                limit: self.config.limit,
                reserve,
            })
    }

    fn assemble(&self, text: &str, spans: &[(usize, usize)]) -> ThreadSequence {
        let total = spans.len();
        let chunks = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| {
                let body = text[start..end].to_string();
                let rendered = if total >= 2 {
                    format!("{} {}", body, self.config.template.render(i + 1, total))
                } else {
                    body.clone()
                };
                Chunk::new(i, body, rendered)
            })
            .collect();
        ThreadSequence::new(chunks)
    }
}

/// Chunk `text` with `config`; convenience for one-off calls.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Result<ThreadSequence, ChunkError> {
    ThreadChunker::new(config.clone())?.chunk(text)
}

/// Byte spans of the whitespace-separated words in `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Greedily pack words into chunk spans no wider than `effective`
/// characters. Gaps between words inside a chunk count at their
/// verbatim width.
fn layout(text: &str, words: &[(usize, usize)], effective: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    // Span and character count of the chunk being filled.
    let mut open: Option<(usize, usize, usize)> = None;

    for &(word_start, word_end) in words {
        let word_chars = text[word_start..word_end].chars().count();
        match open {
            Some((start, end, count)) => {
                let gap = text[end..word_start].chars().count();
                if count + gap + word_chars <= effective {
                    open = Some((start, word_end, count + gap + word_chars));
                } else {
                    spans.push((start, end));
                    open = Some(place_word(
                        text, word_start, word_end, word_chars, effective, &mut spans,
                    ));
                }
            }
            None => {
                open = Some(place_word(
                    text, word_start, word_end, word_chars, effective, &mut spans,
                ));
            }
        }
    }
    if let Some((start, end, _)) = open {
        spans.push((start, end));
    }
    spans
}

/// Open a fresh chunk at a word, force-splitting at character
/// boundaries when the word alone exceeds the effective limit.
fn place_word(
    text: &str,
    start: usize,
    end: usize,
    chars: usize,
    effective: usize,
    spans: &mut Vec<(usize, usize)>,
) -> (usize, usize, usize) {
    if chars <= effective {
        return (start, end, chars);
    }
    let mut boundaries: Vec<usize> = text[start..end]
        .char_indices()
        .map(|(offset, _)| start + offset)
        .collect();
    boundaries.push(end);

    let mut at = 0;
    while boundaries.len() - 1 - at > effective {
        spans.push((boundaries[at], boundaries[at + effective]));
        at += effective;
    }
    (boundaries[at], end, boundaries.len() - 1 - at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(limit: usize) -> ChunkConfig {
        ChunkConfig {
            limit,
            ..ChunkConfig::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_thread() {
        let thread = chunk_text("", &ChunkConfig::default()).unwrap();
        assert!(thread.is_empty());
        let thread = chunk_text("  \n\t  ", &ChunkConfig::default()).unwrap();
        assert!(thread.is_empty());
    }

    #[test]
    fn short_text_is_a_single_unnumbered_chunk() {
        let text = "Fifty characters of text, fitting well under it.";
        let thread = chunk_text(text, &ChunkConfig::default()).unwrap();
        assert_eq!(thread.len(), 1);
        let chunk = thread.get(0).unwrap();
        assert_eq!(chunk.body, text);
        assert_eq!(chunk.rendered, text);
        assert_eq!(chunk.index, 0);
    }

    #[test]
    fn multi_chunk_thread_numbers_every_chunk() {
        let sentence = "this sentence is repeated until the text no longer fits in one post. ";
        let text = sentence.repeat(9); // well past two chunks at 280
        let cfg = ChunkConfig {
            limit: 280,
            template: NumberingTemplate::parse("({i}/{n})").unwrap(),
            suffix_counts: true,
        };
        let thread = chunk_text(&text, &cfg).unwrap();
        let total = thread.len();
        assert!(total >= 2);
        for chunk in &thread {
            assert!(chunk.char_count <= 280, "chunk {} too long", chunk.index);
            let suffix = format!(" ({}/{})", chunk.index + 1, total);
            assert!(
                chunk.rendered.ends_with(&suffix),
                "chunk {} missing suffix {suffix:?}",
                chunk.index
            );
        }
    }

    #[test]
    fn splits_only_at_whitespace() {
        let text = "alpha beta gamma delta epsilon zeta";
        let thread = chunk_text(text, &config(14)).unwrap();
        for chunk in &thread {
            for word in chunk.body.split_whitespace() {
                assert!(text.split_whitespace().any(|w| w == word));
            }
        }
        let rejoined: Vec<&str> = thread
            .iter()
            .flat_map(|c| c.body.split_whitespace())
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn interior_whitespace_is_preserved() {
        let text = "alpha  beta\t\tgamma";
        let thread = chunk_text(text, &config(280)).unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread.get(0).unwrap().body, "alpha  beta\t\tgamma");
    }

    #[test]
    fn chunk_edges_are_trimmed() {
        let text = "   padded with space   ";
        let thread = chunk_text(text, &config(280)).unwrap();
        assert_eq!(thread.get(0).unwrap().body, "padded with space");
    }

    #[test]
    fn oversized_word_is_force_split() {
        let word = "a".repeat(300);
        let cfg = ChunkConfig {
            limit: 280,
            suffix_counts: false,
            ..ChunkConfig::default()
        };
        let thread = chunk_text(&word, &cfg).unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread.get(0).unwrap().body.chars().count(), 280);
        assert_eq!(thread.get(1).unwrap().body.chars().count(), 20);
    }

    #[test]
    fn oversized_word_respects_numbering_reserve() {
        let word = "b".repeat(300);
        let thread = chunk_text(&word, &ChunkConfig::default()).unwrap();
        assert!(thread.len() >= 2);
        for chunk in &thread {
            assert!(chunk.char_count <= 280);
        }
    }

    #[test]
    fn force_split_lands_on_char_boundaries() {
        // Multibyte scalars; a byte-based split would panic on slicing.
        let word = "é".repeat(50);
        let thread = chunk_text(&word, &config(20)).unwrap();
        assert!(thread.len() >= 3);
        for chunk in &thread {
            assert!(chunk.char_count <= 20);
        }
    }

    #[test]
    fn suffix_can_be_excluded_from_the_limit() {
        let text = "word ".repeat(120);
        let cfg = ChunkConfig {
            limit: 40,
            suffix_counts: false,
            ..ChunkConfig::default()
        };
        let thread = chunk_text(&text, &cfg).unwrap();
        for chunk in &thread {
            assert!(chunk.body.chars().count() <= 40);
        }
        // Rendered text may exceed the limit; the body may not.
        assert!(thread.iter().any(|c| c.char_count > 40 - 4));
    }

    #[test]
    fn numbering_reserve_shrinks_the_effective_limit() {
        // Ten 6-character words: one chunk of 34 chars would fit 5 words
        // at limit 34, but the "i/n" reserve pushes words out.
        let text = "abcdef ".repeat(10);
        let unnumbered = chunk_text(
            &text,
            &ChunkConfig {
                limit: 34,
                suffix_counts: false,
                ..ChunkConfig::default()
            },
        )
        .unwrap();
        let numbered = chunk_text(&text, &config(34)).unwrap();
        assert!(numbered.len() > unnumbered.len());
        for chunk in &numbered {
            assert!(chunk.char_count <= 34);
        }
    }

    #[test]
    fn limit_smaller_than_reserve_is_a_configuration_error() {
        let err = chunk_text("hello world", &config(1)).unwrap_err();
        assert!(matches!(err, ChunkError::LimitTooSmall { .. }));
    }

    #[test]
    fn zero_limit_is_rejected_at_construction() {
        let err = ThreadChunker::new(config(0)).unwrap_err();
        assert!(matches!(err, ChunkError::LimitTooSmall { limit: 0, .. }));
    }

    #[test]
    fn chunking_twice_is_identical() {
        let text = "repeatable input ".repeat(60);
        let first = chunk_text(&text, &config(100)).unwrap();
        let second = chunk_text(&text, &config(100)).unwrap();
        assert_eq!(first, second);
    }
}
