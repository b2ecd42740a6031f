#![warn(missing_docs)]

//! Entry point for the `markmenu-sim` binary.

mod check;
mod cli;
mod error;
mod replay;
mod script;

use std::{fs, path::Path, process};

use clap::Parser;
use markmenu_engine::Scene;
use tracing::{error, info};

use crate::{
    cli::{Cli, Commands},
    error::{Error, Result},
    replay::Replay,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    logging::init(&log.spec());

    match command {
        Commands::Replay(args) => {
            let cfg = menu_config::load_from_path(&args.config)?;
            let scene = Scene::from_ron(&read(&args.scene)?)?;
            let script = script::parse(&read(&args.script)?)?;
            info!(steps = script.steps.len(), "replay_start");
            let mut replay = Replay::new(&cfg, scene);
            replay.run(&script)?;
            info!(visible = replay.controller().is_visible(), "replay_done");
            for line in replay.lines() {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Check(args) => {
            let cfg = menu_config::load_from_path(&args.config)?;
            for line in check::report(&cfg) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
