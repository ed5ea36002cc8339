//! Entry point for the `spool` binary

use anyhow::Result;
use clap::{Parser, Subcommand};

use spool_cli::commands::{ChunkArgs, PostArgs, ValidateArgs};

#[derive(Debug, Parser)]
#[command(
    name = "spool",
    version,
    about = "Split long text into post-sized chunks and publish them as a thread"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress log output entirely
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split text into a numbered thread and print it
    Chunk(ChunkArgs),
    /// Check a thread against posting constraints
    Validate(ValidateArgs),
    /// Post a thread as a reply chain
    Post(PostArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Chunk(args) => args.execute(),
        Command::Validate(args) => args.execute(),
        Command::Post(args) => args.execute().await,
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
