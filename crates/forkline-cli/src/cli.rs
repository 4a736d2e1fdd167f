use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use forkline_diff::DiffMode;

#[derive(Parser)]
#[command(
    name = "forkline",
    about = "Forkline: versioned text with undo, redo, and branch merging",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a line or word diff between two files
    Diff(DiffArgs),
    /// Apply a script of string operations and show the resulting history
    Replay(ReplayArgs),
    /// Show the effective engine configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[arg(long, default_value = "line")]
    pub mode: ModeArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Line,
    Word,
}

impl From<ModeArg> for DiffMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Line => DiffMode::LineByLine,
            ModeArg::Word => DiffMode::WordByWord,
        }
    }
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON array of operations, e.g. `[{"type": "CONCAT", "value": "!"}]`
    pub script: PathBuf,
    #[arg(long, default_value = "")]
    pub initial: String,
    /// Number of operations to undo after replaying
    #[arg(long, default_value = "0")]
    pub undo: usize,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
}
