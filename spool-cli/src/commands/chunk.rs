//! `spool chunk`: split text and print the thread

use std::io;
use std::path::PathBuf;

use clap::Args;
use spool_core::{chunk_text, EXPORT_SEPARATOR};
use tracing::debug;

use super::{ChunkOptions, OutputFormat};
use crate::error::CliResult;
use crate::input;
use crate::output::{JsonFormatter, MarkdownFormatter, TextFormatter, ThreadFormatter};

/// Arguments for the chunk command
#[derive(Debug, Args)]
pub struct ChunkArgs {
    /// Input file (stdin when omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub chunking: ChunkOptions,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Separator between chunks in text output
    #[arg(long, default_value = EXPORT_SEPARATOR)]
    pub separator: String,

    /// Append thread statistics
    #[arg(long)]
    pub stats: bool,
}

impl ChunkArgs {
    /// Execute the chunk command
    pub fn execute(&self) -> CliResult<()> {
        let text = input::read_text(self.input.as_deref())?;
        let config = self.chunking.to_config()?;
        let thread = chunk_text(&text, &config)?;
        debug!(chunks = thread.len(), "chunked input");

        let stats = self.stats.then(|| thread.stats(config.limit)).flatten();
        let stdout = io::stdout();
        let mut formatter: Box<dyn ThreadFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(stdout, self.separator.clone())),
            OutputFormat::Json => Box::new(JsonFormatter::new(stdout)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(stdout)),
        };

        let total = thread.len();
        for chunk in &thread {
            formatter.write_chunk(chunk, total)?;
        }
        formatter.finish(stats.as_ref())?;
        Ok(())
    }
}
