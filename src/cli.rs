use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task and project workspace CLI.
/// State lives in ~/.taskdesk or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "td", version, about = "Task and project workspace CLI")]
pub struct Cli {
    /// Directory holding the JSON state snapshots.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
