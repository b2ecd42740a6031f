//! Command-line interface definitions for markmenu-sim.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `markmenu-sim` binary.
#[derive(Parser, Debug)]
#[command(
    name = "markmenu-sim",
    about = "Replay marking-menu gestures against a simulated host",
    version
)]
pub struct Cli {
    /// Logging controls shared across markmenu binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a gesture script and print host calls and controller events.
    Replay(ReplayArgs),
    /// Load a configuration and print the normalized binding table.
    Check(CheckArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Controller configuration (`.ron` or `.json`).
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Scene description (RON).
    #[arg(long, value_name = "PATH")]
    pub scene: PathBuf,

    /// Gesture script (RON).
    #[arg(long, value_name = "PATH")]
    pub script: PathBuf,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Controller configuration (`.ron` or `.json`).
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,
}
