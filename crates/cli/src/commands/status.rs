// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flowctl status` — print each target's resolved `TargetStatus`.

use crate::commands::make_backend;
use crate::config::Config;
use crate::table::{Column, Table};
use anyhow::Result;
use clap::Args;
use flowctl_core::TargetIdx;
use flowctl_engine::{Backend, Scheduler};
use flowctl_storage::{FileStateStore, StateStore};

#[derive(Args)]
pub struct StatusArgs {
    /// Only report on these targets (and implicitly visits their
    /// dependencies to resolve status). Defaults to every target.
    pub targets: Vec<String>,
}

pub async fn handle(args: StatusArgs, config: &Config) -> Result<()> {
    let graph = crate::commands::load_graph(&config.workflow_file)?;
    let idxs = if args.targets.is_empty() {
        graph.iter().collect()
    } else {
        crate::commands::resolve_targets(&graph, &args.targets)?
    };

    let store = FileStateStore::open(&config.state_dir)?;
    let backend = make_backend(&config.backend)?;
    let scheduler = Scheduler::new(graph, store, backend, false);

    let rows = statuses(&scheduler, &idxs).await?;
    scheduler.close().await?;

    let mut table = Table::new(vec![Column { header: "TARGET" }, Column { header: "STATUS" }]);
    for (name, status) in rows {
        table.push_row(vec![name, status]);
    }
    print!("{}", table.render());
    Ok(())
}

async fn statuses<S: StateStore, B: Backend>(
    scheduler: &Scheduler<S, B>,
    idxs: &[TargetIdx],
) -> Result<Vec<(String, String)>, flowctl_engine::EngineError> {
    let mut rows = Vec::with_capacity(idxs.len());
    for &idx in idxs {
        let status = scheduler.status(idx).await?;
        let name = scheduler.graph().target(idx).name().to_string();
        rows.push((name, status.to_string()));
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
