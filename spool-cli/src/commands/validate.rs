//! `spool validate`: check a thread against posting constraints

use std::path::PathBuf;

use clap::Args;
use spool_core::{chunk_text, validate_for_posting, RECOMMENDED_MAX_CHUNKS};

use super::ChunkOptions;
use crate::error::{CliError, CliResult};
use crate::input;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input file (stdin when omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub chunking: ChunkOptions,

    /// Maximum chunks allowed per thread
    #[arg(long, default_value_t = RECOMMENDED_MAX_CHUNKS)]
    pub max_chunks: usize,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let text = input::read_text(self.input.as_deref())?;
        let config = self.chunking.to_config()?;
        let thread = chunk_text(&text, &config)?;

        let problems = validate_for_posting(&thread, config.limit, self.max_chunks);
        if problems.is_empty() {
            println!("ok: {} chunks ready to post", thread.len());
            return Ok(());
        }
        for problem in &problems {
            eprintln!("problem: {problem}");
        }
        Err(CliError::Validation(problems).into())
    }
}
