//! Sequential thread posting with pacing, retry, and cancellation

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::client::{PostId, SubmitClient};
use crate::error::{ErrorKind, PostError};
use crate::thread::{Chunk, ThreadSequence};

/// Default lower bound between consecutive submissions.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(3);

/// Pacing and retry policy for one posting session.
#[derive(Debug, Clone)]
pub struct PostPolicy {
    /// Minimum wait between the completion of one submission and the
    /// start of the next
    pub min_delay: Duration,
    /// Additional attempts allowed per chunk after the first
    pub max_retries: u32,
    /// First retry backoff; doubles per retry
    pub initial_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Abort the chain when the platform rejects a chunk's content.
    /// When false the rejected chunk is skipped and its successor
    /// replies to the last successful post.
    pub abort_on_reject: bool,
}

impl Default for PostPolicy {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            abort_on_reject: true,
        }
    }
}

/// Submission lifecycle of a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Not yet submitted
    Pending,
    /// Submission in flight
    Submitting,
    /// Waiting out a backoff before submitting again
    Retrying,
    /// Platform accepted the chunk
    Succeeded,
    /// Gave up on this chunk
    Failed,
}

/// Lifecycle of the whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Validated, not yet started
    Ready,
    /// Submissions underway
    InProgress,
    /// Every chunk was attempted
    Completed,
    /// Stopped early; remaining chunks were never attempted
    Aborted,
}

/// Final status of one chunk after the session ends.
#[derive(Debug, Clone, PartialEq)]
pub enum PostStatus {
    /// Platform accepted the chunk and assigned this id
    Succeeded(PostId),
    /// All attempts failed; the classification of the last failure
    Failed {
        /// What went wrong
        kind: ErrorKind,
        /// Message from the last attempt
        message: String,
    },
    /// The session ended before this chunk was submitted
    NotAttempted,
}

/// Per-chunk result record; immutable once the session finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct PostOutcome {
    /// 0-based chunk index
    pub index: usize,
    /// Terminal status
    pub status: PostStatus,
    /// Submission attempts made, zero when never attempted
    pub attempts: u32,
}

/// What a posting session produced.
#[derive(Debug, Clone)]
pub struct ThreadReport {
    /// One outcome per chunk, aligned with the thread
    pub outcomes: Vec<PostOutcome>,
    /// Terminal chain state
    pub chain: ChainState,
    /// Id of the first successful post, the thread's root
    pub first_post: Option<PostId>,
}

impl ThreadReport {
    /// Number of chunks the platform accepted.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, PostStatus::Succeeded(_)))
            .count()
    }

    /// Whether the whole thread went out.
    pub fn fully_posted(&self) -> bool {
        self.chain == ChainState::Completed && self.succeeded() == self.outcomes.len()
    }
}

struct ChunkRun {
    status: PostStatus,
    attempts: u32,
    cancelled: bool,
}

/// Posts a thread as a reply chain: strictly in order, one submission
/// at a time.
///
/// The poster owns pacing and retry; its client is expected to perform
/// exactly one submission per call. Independent posters may run
/// concurrently, each with its own client and pacing state.
pub struct ThreadPoster<C> {
    client: C,
    policy: PostPolicy,
}

impl<C: SubmitClient> ThreadPoster<C> {
    /// Create a poster over an authenticated client.
    pub fn new(client: C, policy: PostPolicy) -> Self {
        Self { client, policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &PostPolicy {
        &self.policy
    }

    /// The underlying client capability.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Post a thread to completion or abort.
    pub async fn post(&self, thread: &ThreadSequence) -> Result<ThreadReport, PostError> {
        // Keep the sender alive for the whole session so the token can
        // never fire.
        let (_sender, cancel) = watch::channel(false);
        self.post_with_cancel(thread, cancel).await
    }

    /// Post a thread, stopping early when `cancel` turns true.
    ///
    /// Cancellation is honored between submissions only: an in-flight
    /// submission is always awaited to completion, so the chain never
    /// ends in an ambiguous state.
    pub async fn post_with_cancel(
        &self,
        thread: &ThreadSequence,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<ThreadReport, PostError> {
        if thread.is_empty() {
            return Err(PostError::ChainIntegrity(
                "cannot post an empty thread".into(),
            ));
        }

        let mut chain = ChainState::Ready;
        debug!(chunks = thread.len(), ?chain, "thread accepted for posting");
        let mut outcomes: Vec<PostOutcome> = Vec::with_capacity(thread.len());
        let mut reply_to: Option<PostId> = None;
        let mut first_post: Option<PostId> = None;
        let mut last_submission: Option<Instant> = None;

        chain = ChainState::InProgress;

        for chunk in thread {
            if *cancel.borrow() {
                chain = ChainState::Aborted;
                break;
            }

            let run = self
                .submit_chunk(chunk, reply_to.as_ref(), &mut cancel, &mut last_submission)
                .await;

            // A success still anchors the chain even when the session
            // was cancelled while it was in flight.
            if let PostStatus::Succeeded(id) = &run.status {
                if first_post.is_none() {
                    first_post = Some(id.clone());
                }
                reply_to = Some(id.clone());
            }

            let abort = run.cancelled
                || match &run.status {
                    PostStatus::Succeeded(_) => false,
                    PostStatus::Failed { kind, .. } => match kind {
                        ErrorKind::ContentRejected => self.policy.abort_on_reject,
                        _ => true,
                    },
                    // Only reachable through cancellation.
                    PostStatus::NotAttempted => true,
                };

            outcomes.push(PostOutcome {
                index: chunk.index,
                status: run.status,
                attempts: run.attempts,
            });

            if abort {
                chain = ChainState::Aborted;
                break;
            }
        }

        while outcomes.len() < thread.len() {
            outcomes.push(PostOutcome {
                index: outcomes.len(),
                status: PostStatus::NotAttempted,
                attempts: 0,
            });
        }
        if chain == ChainState::InProgress {
            chain = ChainState::Completed;
        }
        debug!(?chain, succeeded = outcomes.iter().filter(|o| matches!(o.status, PostStatus::Succeeded(_))).count(), "posting finished");

        Ok(ThreadReport {
            outcomes,
            chain,
            first_post,
        })
    }

    /// Drive one chunk through its state machine until it reaches a
    /// terminal state or the session is cancelled.
    async fn submit_chunk(
        &self,
        chunk: &Chunk,
        reply_to: Option<&PostId>,
        cancel: &mut watch::Receiver<bool>,
        last_submission: &mut Option<Instant>,
    ) -> ChunkRun {
        let mut state = ChunkState::Pending;
        let mut attempts = 0u32;
        let mut backoff = self.policy.initial_backoff;
        let mut retry_wait = Duration::ZERO;
        let mut succeeded: Option<PostId> = None;
        let mut last_failure: Option<PostError> = None;
        let mut cancelled = false;

        loop {
            match state {
                ChunkState::Pending | ChunkState::Retrying => {
                    // Pacing is measured from the completion of the
                    // previous submission, whatever its outcome; a
                    // retry backoff can only lengthen the wait.
                    let pace = last_submission
                        .map(|at| self.policy.min_delay.saturating_sub(at.elapsed()))
                        .unwrap_or(Duration::ZERO);
                    let wait = pace.max(retry_wait);
                    if !wait.is_zero() && sleep_unless_cancelled(wait, cancel).await {
                        cancelled = true;
                        break;
                    }
                    state = ChunkState::Submitting;
                }
                ChunkState::Submitting => {
                    attempts += 1;
                    debug!(index = chunk.index, attempt = attempts, "submitting chunk");
                    // Awaited to completion unconditionally; see
                    // post_with_cancel.
                    let result = self.client.submit(&chunk.rendered, reply_to).await;
                    *last_submission = Some(Instant::now());
                    match result {
                        Ok(id) => {
                            succeeded = Some(id);
                            state = ChunkState::Succeeded;
                        }
                        Err(e) if e.is_retryable() && attempts <= self.policy.max_retries => {
                            retry_wait = backoff.max(e.retry_after().unwrap_or(Duration::ZERO));
                            warn!(
                                index = chunk.index,
                                attempt = attempts,
                                wait_ms = retry_wait.as_millis() as u64,
                                error = %e,
                                "transient failure, will retry"
                            );
                            backoff = (backoff * 2).min(self.policy.max_backoff);
                            last_failure = Some(e);
                            state = ChunkState::Retrying;
                        }
                        Err(e) => {
                            warn!(index = chunk.index, attempt = attempts, error = %e, "chunk failed");
                            last_failure = Some(e);
                            state = ChunkState::Failed;
                        }
                    }
                }
                ChunkState::Succeeded | ChunkState::Failed => break,
            }
        }

        let status = if let Some(id) = succeeded {
            PostStatus::Succeeded(id)
        } else if let Some(e) = last_failure {
            // Covers both exhausted chunks and a cancellation that
            // interrupted a retry backoff: the chunk did fail.
            PostStatus::Failed {
                kind: e.kind(),
                message: e.to_string(),
            }
        } else {
            PostStatus::NotAttempted
        };

        ChunkRun {
            status,
            attempts,
            cancelled,
        }
    }
}

/// Sleep for `wait`, returning true when the cancel token fires first.
async fn sleep_unless_cancelled(wait: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    if *cancel.borrow() {
        return true;
    }
    tokio::select! {
        _ = time::sleep(wait) => false,
        _ = cancelled(cancel) => true,
    }
}

/// Resolves when the token turns true; pends forever once the sender is
/// gone, so a dropped sender reads as "never cancelled".
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
