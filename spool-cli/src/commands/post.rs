//! `spool post`: publish a thread as a reply chain

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio::sync::watch;
use tracing::info;

use spool_core::{
    chunk_text, estimate_posting_time, tweet_url, validate_for_posting, ChainState, Credentials,
    PostPolicy, PostStatus, ThreadPoster, TwitterClient, RECOMMENDED_MAX_CHUNKS,
};

use super::ChunkOptions;
use crate::error::{CliError, CliResult};
use crate::input;

/// Arguments for the post command
#[derive(Debug, Args)]
pub struct PostArgs {
    /// Input file (stdin when omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub chunking: ChunkOptions,

    /// Seconds to wait between posts
    #[arg(short, long, default_value_t = 3)]
    pub delay: u64,

    /// Retry attempts per chunk after the first
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Skip rejected chunks instead of aborting the thread
    #[arg(long)]
    pub continue_on_reject: bool,

    /// Maximum chunks allowed per thread
    #[arg(long, default_value_t = RECOMMENDED_MAX_CHUNKS)]
    pub max_chunks: usize,

    /// Post without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// API consumer key
    #[arg(long, env = "SPOOL_CONSUMER_KEY", hide_env_values = true)]
    pub consumer_key: String,

    /// API consumer secret
    #[arg(long, env = "SPOOL_CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: String,

    /// User access token
    #[arg(long, env = "SPOOL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// User access token secret
    #[arg(long, env = "SPOOL_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub access_token_secret: String,
}

impl PostArgs {
    /// Execute the post command
    pub async fn execute(&self) -> CliResult<()> {
        let text = input::read_text(self.input.as_deref())?;
        let config = self.chunking.to_config()?;
        let thread = chunk_text(&text, &config)?;

        let problems = validate_for_posting(&thread, config.limit, self.max_chunks);
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("problem: {problem}");
            }
            return Err(CliError::Validation(problems).into());
        }

        let delay = Duration::from_secs(self.delay);
        println!(
            "{} chunks ready, estimated posting time {}",
            thread.len(),
            estimate_posting_time(thread.len(), delay)
        );
        if !self.yes {
            return Err(CliError::ConfirmationRequired.into());
        }

        let client = TwitterClient::new(Credentials {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            access_token: self.access_token.clone(),
            access_token_secret: self.access_token_secret.clone(),
        })?;
        let policy = PostPolicy {
            min_delay: delay,
            max_retries: self.max_retries,
            abort_on_reject: !self.continue_on_reject,
            ..PostPolicy::default()
        };
        let poster = ThreadPoster::new(client, policy);

        // Ctrl-C stops the session after the in-flight submission, so
        // the chain never ends in an ambiguous state.
        let (cancel_tx, cancel_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("cancellation requested, finishing the in-flight submission");
                let _ = cancel_tx.send(true);
            }
        });

        let report = poster.post_with_cancel(&thread, cancel_rx).await?;

        for outcome in &report.outcomes {
            match &outcome.status {
                PostStatus::Succeeded(id) => {
                    println!("chunk {}: posted as {id}", outcome.index + 1);
                }
                PostStatus::Failed { kind, message } => {
                    println!(
                        "chunk {}: failed ({kind}) after {} attempts: {message}",
                        outcome.index + 1,
                        outcome.attempts
                    );
                }
                PostStatus::NotAttempted => {
                    println!("chunk {}: not attempted", outcome.index + 1);
                }
            }
        }
        if let Some(id) = &report.first_post {
            println!("thread: {}", tweet_url(id));
        }

        match report.chain {
            ChainState::Completed => Ok(()),
            _ => Err(CliError::Incomplete {
                posted: report.succeeded(),
                total: report.outcomes.len(),
            }
            .into()),
        }
    }
}
