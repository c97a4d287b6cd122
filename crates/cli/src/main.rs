// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! flowctl - a workflow build engine for scientific batch computing.

mod commands;
mod config;
mod env;
mod logging;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flowctl", version, about = "A workflow build engine for scientific batch computing")]
struct Cli {
    /// Change to <dir> before doing anything.
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Workflow file to load.
    #[arg(short = 'f', long = "file", global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Backend to submit targets to.
    #[arg(short = 'b', long = "backend", global = true, value_name = "NAME")]
    backend: Option<String>,

    /// State store directory (defaults to FLOWCTL_STATE_DIR or the XDG
    /// state directory).
    #[arg(long = "state-dir", global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule the stale transitive closure of the named targets.
    Run(commands::run::RunArgs),
    /// Print each target's resolved status.
    Status(commands::status::StatusArgs),
    /// Reset persisted execution state for the named targets.
    Clean(commands::clean::CleanArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .map_err(|e| anyhow::anyhow!("cannot change to directory '{}': {e}", dir.display()))?;
    }

    let config = Config::load(Overrides {
        backend: cli.backend,
        state_dir: cli.state_dir,
        workflow_file: cli.file,
    })?;

    match cli.command {
        Commands::Run(args) => commands::run::handle(args, &config).await,
        Commands::Status(args) => commands::status::handle(args, &config).await,
        Commands::Clean(args) => commands::clean::handle(args, &config).await,
    }
}
