// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flowctl run` — schedule the stale transitive closure of the named
//! targets (or every endpoint, if none are named) onto the configured
//! backend.

use crate::commands::{make_backend, resolve_targets};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use flowctl_core::TargetIdx;
use flowctl_engine::{Backend, Scheduler};
use flowctl_storage::{FileStateStore, StateStore};

#[derive(Args)]
pub struct RunArgs {
    /// Targets to run (and their dependencies). Defaults to every endpoint.
    pub targets: Vec<String>,

    /// Compute what would be submitted without mutating state or calling
    /// the backend.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle(args: RunArgs, config: &Config) -> Result<()> {
    let graph = crate::commands::load_graph(&config.workflow_file)?;
    let idxs = resolve_targets(&graph, &args.targets)?;

    let store = FileStateStore::open(&config.state_dir)?;
    let backend = make_backend(&config.backend)?;
    let scheduler = Scheduler::new(graph, store, backend, args.dry_run);

    let results = run_scheduled(&scheduler, &idxs).await?;
    scheduler.close().await?;

    for (name, submitted) in results {
        if submitted {
            println!("submitted {name}");
        } else {
            println!("up to date {name}");
        }
    }
    Ok(())
}

/// Schedule `idxs` and pair each with its target name, generic over the
/// store/backend so tests can exercise it with in-memory fakes instead of
/// a real `FileStateStore`/`LocalBackend` pair.
async fn run_scheduled<S: StateStore, B: Backend>(
    scheduler: &Scheduler<S, B>,
    idxs: &[TargetIdx],
) -> Result<Vec<(String, bool)>, flowctl_engine::EngineError> {
    let results = scheduler.schedule_many(idxs).await?;
    Ok(idxs
        .iter()
        .zip(results)
        .map(|(&idx, submitted)| (scheduler.graph().target(idx).name().to_string(), submitted))
        .collect())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
