//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for scribe.
#[derive(Debug, Parser)]
#[command(name = "scribe")]
#[command(about = "OpenAI-compatible gateway and blog drafting agent for Ollama")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
