//! CLI subcommand implementations

mod chunk;
mod post;
mod validate;

pub use chunk::ChunkArgs;
pub use post::PostArgs;
pub use validate::ValidateArgs;

use clap::{Args, ValueEnum};
use spool_core::{ChunkConfig, NumberingTemplate, POST_CHAR_LIMIT};

use crate::error::CliResult;

/// Supported output formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Rendered chunks separated for copy/paste
    Text,
    /// JSON array of chunks with metadata
    Json,
    /// Markdown preview with per-chunk headings
    Markdown,
}

/// Chunking options shared by every subcommand
#[derive(Debug, Args)]
pub struct ChunkOptions {
    /// Maximum characters per chunk
    #[arg(short, long, default_value_t = POST_CHAR_LIMIT)]
    pub limit: usize,

    /// Numbering template; {i} is the chunk position, {n} the total
    #[arg(short, long, default_value = "{i}/{n}")]
    pub template: String,

    /// Do not count the numbering suffix against the limit
    #[arg(long)]
    pub no_count_suffix: bool,
}

impl ChunkOptions {
    /// Resolve the flags into a chunker configuration.
    pub fn to_config(&self) -> CliResult<ChunkConfig> {
        let template = NumberingTemplate::parse(&self.template)?;
        Ok(ChunkConfig {
            limit: self.limit,
            template,
            suffix_counts: !self.no_count_suffix,
        })
    }
}
