use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "aspect-diff",
    about = "Diff a JSON-LD graph against its versioned store snapshot",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML diff config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Treat the input as the complete current graph; stored nodes it lacks are deleted
    Complete {
        #[command(flatten)]
        io: DiffArgs,
    },

    /// Treat the input as additions and updates only; nothing is deleted
    Entries {
        #[command(flatten)]
        io: DiffArgs,
    },
}

#[derive(Args)]
pub struct DiffArgs {
    /// JSON-LD document with the current graph (`-` for stdin)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// JSON-LD document with the stored versioned graph; empty store if omitted
    #[arg(long, short = 'e')]
    pub existing: Option<PathBuf>,

    /// Version info segment for new versions (defaults to the config policy)
    #[arg(long)]
    pub version_info: Option<String>,

    /// Pretty-print the payload
    #[arg(long)]
    pub pretty: bool,
}
