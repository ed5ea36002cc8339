//! Error handling for the CLI application

use std::fmt;

/// CLI-specific failures surfaced to the user.
#[derive(Debug)]
pub enum CliError {
    /// Thread failed pre-posting validation
    Validation(Vec<String>),
    /// Posting would start without explicit confirmation
    ConfirmationRequired,
    /// Posting stopped before the chain completed
    Incomplete {
        /// Chunks the platform accepted
        posted: usize,
        /// Chunks in the thread
        total: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Validation(problems) => {
                write!(f, "thread failed validation: {}", problems.join("; "))
            }
            CliError::ConfirmationRequired => {
                write!(f, "refusing to post without --yes")
            }
            CliError::Incomplete { posted, total } => {
                write!(f, "thread incomplete: {posted} of {total} chunks posted")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
