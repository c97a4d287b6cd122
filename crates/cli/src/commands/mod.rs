// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommand implementations.

pub mod clean;
pub mod run;
pub mod status;

use anyhow::{bail, Result};
use flowctl_core::{Graph, TargetIdx};
use std::path::Path;

/// Parse and build the dependency graph for a workflow file.
pub fn load_graph(workflow_file: &Path) -> Result<Graph> {
    let workflow = flowctl_workflow::Workflow::from_path(workflow_file)?;
    let graph = Graph::from_targets(workflow.into_targets().into_values())?;
    Ok(graph)
}

/// Resolve a list of target names to indices; an empty list resolves to
/// every endpoint, the natural default for a bare run with no explicit
/// target names.
pub fn resolve_targets(graph: &Graph, names: &[String]) -> Result<Vec<TargetIdx>> {
    if names.is_empty() {
        return Ok(graph.endpoints());
    }
    names
        .iter()
        .map(|name| {
            graph
                .idx_of(name)
                .ok_or_else(|| anyhow::anyhow!("unknown target: {name}"))
        })
        .collect()
}

/// Build the named backend. Backends are a fixed, compiled-in set
/// selected by name — there is no dynamic plugin loader.
pub fn make_backend(name: &str) -> Result<flowctl_backend::LocalBackend> {
    match name {
        "local" => Ok(flowctl_backend::LocalBackend::new()),
        other => bail!("unknown backend: {other} (known backends: local)"),
    }
}
