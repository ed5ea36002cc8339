//! Error types for chunking and posting

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors raised while chunking.
///
/// All of these are surfaced before any posting attempt; a thread that
/// failed to chunk is never handed to the sequencer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// The limit leaves no room for body text once the numbering
    /// reserve is subtracted.
    #[error("chunk limit {limit} cannot fit any text next to a {reserve}-character numbering reserve")]
    LimitTooSmall {
        /// Configured chunk limit
        limit: usize,
        /// Worst-case numbering width, separator included
        reserve: usize,
    },

    /// The numbering template could not be parsed.
    #[error("invalid numbering template: {0}")]
    Template(String),

    /// The assumed chunk count and the resulting chunk count never
    /// agreed within the iteration bound.
    #[error("numbering width did not stabilize after {0} rounds")]
    Unconverged(usize),
}

/// Classification of a posting failure, as reported in outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Worth retrying with backoff
    Transient,
    /// Fatal for the whole session
    Auth,
    /// Fatal for the chunk
    ContentRejected,
    /// A reply was attempted without a valid parent
    ChainIntegrity,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Transient => "transient",
            ErrorKind::Auth => "auth",
            ErrorKind::ContentRejected => "content_rejected",
            ErrorKind::ChainIntegrity => "chain_integrity",
        };
        f.write_str(label)
    }
}

/// Errors surfaced while submitting posts to the platform.
#[derive(Error, Debug)]
pub enum PostError {
    /// Retryable failure: rate limiting, 5xx, or a network hiccup.
    #[error("transient platform error: {message}")]
    Transient {
        /// Human-readable description from the platform or transport
        message: String,
        /// Server-mandated wait before the next attempt, when known
        retry_after: Option<Duration>,
    },

    /// Credentials rejected; fatal for the whole session.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The platform refused this specific content.
    #[error("content rejected: {0}")]
    ContentRejected(String),

    /// The reply chain lost its parent reference.
    #[error("chain integrity: {0}")]
    ChainIntegrity(String),

    /// HTTP transport failure.
    #[cfg(feature = "twitter")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed response payload.
    #[cfg(feature = "twitter")]
    #[error("response decode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PostError {
    /// Map this error onto the outcome taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::Transient { .. } => ErrorKind::Transient,
            PostError::Auth(_) => ErrorKind::Auth,
            PostError::ContentRejected(_) => ErrorKind::ContentRejected,
            PostError::ChainIntegrity(_) => ErrorKind::ChainIntegrity,
            #[cfg(feature = "twitter")]
            PostError::Http(_) => ErrorKind::Transient,
            // A success response we failed to decode may still have
            // created the post; retrying risks a duplicate reply.
            #[cfg(feature = "twitter")]
            PostError::Json(_) => ErrorKind::ContentRejected,
        }
    }

    /// Whether the sequencer may retry the same chunk.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Server-suggested minimum wait before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            PostError::Transient { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        let err = PostError::Transient {
            message: "503".into(),
            retry_after: Some(Duration::from_secs(7)),
        };
        assert!(err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn fatal_errors_are_not_retryable() {
        assert!(!PostError::Auth("bad token".into()).is_retryable());
        assert!(!PostError::ContentRejected("duplicate".into()).is_retryable());
        assert!(!PostError::ChainIntegrity("no parent".into()).is_retryable());
    }

    #[test]
    fn kinds_render_as_snake_case() {
        assert_eq!(ErrorKind::ContentRejected.to_string(), "content_rejected");
        assert_eq!(ErrorKind::Transient.to_string(), "transient");
    }

    #[test]
    fn chunk_error_messages_carry_context() {
        let err = ChunkError::LimitTooSmall { limit: 5, reserve: 8 };
        assert!(err.to_string().contains("limit 5"));
        assert!(err.to_string().contains("8-character"));
    }
}
