//! Reading raw text from a file or stdin

use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::error::CliResult;

/// Read the whole input: from `path` when given, stdin otherwise.
pub fn read_text(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            Ok(buffer)
        }
    }
}
