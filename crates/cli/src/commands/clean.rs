// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flowctl clean` — reset every target's persisted `TargetMeta` to
//! `Unknown`, forcing the next `run` or `status` to re-derive each
//! target's status purely from file timestamps.

use crate::config::Config;
use anyhow::Result;
use clap::Args;
use flowctl_storage::{FileStateStore, StateStore, TargetMeta};

#[derive(Args)]
pub struct CleanArgs {
    /// Only reset these targets. Defaults to every target in the workflow.
    pub targets: Vec<String>,
}

pub async fn handle(args: CleanArgs, config: &Config) -> Result<()> {
    let graph = crate::commands::load_graph(&config.workflow_file)?;
    let names: Vec<String> = if args.targets.is_empty() {
        graph.iter().map(|idx| graph.target(idx).name().to_string()).collect()
    } else {
        crate::commands::resolve_targets(&graph, &args.targets)?
            .into_iter()
            .map(|idx| graph.target(idx).name().to_string())
            .collect()
    };

    let store = FileStateStore::open(&config.state_dir)?;
    reset_all(&store, &names)?;
    store.close()?;
    for name in &names {
        println!("reset {name}");
    }
    Ok(())
}

fn reset_all<S: StateStore>(store: &S, names: &[String]) -> Result<(), flowctl_storage::StateStoreError> {
    for name in names {
        let mut meta = store.get_target_meta(name)?;
        meta.reset(true)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "clean_tests.rs"]
mod tests;
