//! Thread chunking and posting for X (Twitter)
//!
//! Two halves compose this crate. The chunker turns free-form text
//! into an ordered sequence of post-sized chunks, resolving the
//! circular dependency between the numbering suffix width and the
//! chunk count. The poster submits such a sequence as a reply chain,
//! enforcing pacing and retry policy and reporting a per-chunk
//! outcome.
//!
//! ```
//! use spool_core::{chunk_text, ChunkConfig};
//!
//! let text = "A short note that fits in a single post.";
//! let thread = chunk_text(text, &ChunkConfig::default()).unwrap();
//! assert_eq!(thread.len(), 1);
//! for chunk in &thread {
//!     println!("{}", chunk.rendered);
//! }
//! ```

#![warn(missing_docs)]

pub mod chunker;
pub mod client;
pub mod error;
pub mod numbering;
pub mod poster;
pub mod thread;

#[cfg(feature = "twitter")]
mod oauth;
#[cfg(feature = "twitter")]
pub mod twitter;

pub use chunker::{chunk_text, ChunkConfig, ThreadChunker, POST_CHAR_LIMIT};
pub use client::{PostId, SubmitClient};
pub use error::{ChunkError, ErrorKind, PostError};
pub use numbering::NumberingTemplate;
pub use poster::{
    ChainState, ChunkState, PostOutcome, PostPolicy, PostStatus, ThreadPoster, ThreadReport,
    DEFAULT_MIN_DELAY,
};
pub use thread::{
    estimate_posting_time, validate_for_posting, Chunk, ThreadSequence, ThreadStats,
    EXPORT_SEPARATOR, RECOMMENDED_MAX_CHUNKS,
};
#[cfg(feature = "twitter")]
pub use twitter::{tweet_url, Credentials, TwitterClient};
