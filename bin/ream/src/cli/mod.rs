pub mod constants;
pub mod process;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::process::ProcessConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply attestations to a beacon state snapshot
    #[command(name = "process")]
    Process(ProcessConfig),
}
