//! The submit capability the posting sequencer runs against

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PostError;

/// Platform-assigned id of a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Wrap a platform id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated client capability: one operation, submit a post.
///
/// Implementations perform exactly one submission per call and classify
/// failures through [`PostError`]; retry policy belongs to the caller.
/// Passing the capability in explicitly, rather than reading ambient
/// credential state, keeps posting sessions independently testable and
/// safe to run concurrently.
#[async_trait]
pub trait SubmitClient: Send + Sync {
    /// Publish `text`, optionally as a reply to an existing post.
    async fn submit(&self, text: &str, in_reply_to: Option<&PostId>)
        -> Result<PostId, PostError>;
}
