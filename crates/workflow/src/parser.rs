// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses a `flowctl.toml` file into the `name -> Target` mapping
//! `flowctl_core::Graph::from_targets` consumes.

use crate::error::WorkflowError;
use flowctl_core::{OptionValue, PathCollection, Target};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct WorkflowTable {
    working_dir: Option<PathBuf>,
    #[serde(default)]
    defaults: IndexMap<String, OptionValue>,
}

#[derive(Debug, Deserialize)]
struct TargetDef {
    name: String,
    #[serde(default = "PathCollection::empty")]
    inputs: PathCollection,
    #[serde(default = "PathCollection::empty")]
    outputs: PathCollection,
    #[serde(default)]
    options: IndexMap<String, OptionValue>,
    #[serde(default)]
    spec: String,
}

#[derive(Debug, Default, Deserialize)]
struct WorkflowFile {
    #[serde(default)]
    workflow: WorkflowTable,
    #[serde(default, rename = "target")]
    targets: Vec<TargetDef>,
}

/// A parsed `flowctl.toml`: the `name -> Target` mapping the graph builder
/// consumes, plus the workflow-level option defaults already folded into
/// each target via [`Target::inherit_options`].
#[derive(Debug, Clone)]
pub struct Workflow {
    targets: IndexMap<String, Target>,
}

impl Workflow {
    /// Load and parse a workflow file.
    ///
    /// `[workflow].working_dir`, if relative, is resolved against the
    /// directory containing `path`; if absent, targets default to that
    /// same directory. `[workflow].defaults` is merged into each target's
    /// options (an explicit per-target value always wins).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: WorkflowFile = toml::from_str(&contents).map_err(|source| WorkflowError::Toml {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        let file_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let base_dir = match file_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => std::env::current_dir()
                .map_err(|source| WorkflowError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .join(dir),
            None => std::env::current_dir().map_err(|source| WorkflowError::Io {
                path: path.to_path_buf(),
                source,
            })?,
        };

        let working_dir = match file.workflow.working_dir {
            Some(ref wd) if wd.is_absolute() => wd.clone(),
            Some(wd) => base_dir.join(wd),
            None => base_dir,
        };

        let mut targets = IndexMap::new();
        for def in file.targets {
            if targets.contains_key(&def.name) {
                return Err(WorkflowError::DuplicateTarget { name: def.name });
            }
            let mut target = Target::new(
                def.name.clone(),
                working_dir.clone(),
                def.inputs,
                def.outputs,
                def.options,
                def.spec,
            )?;
            target.inherit_options(&file.workflow.defaults);
            targets.insert(def.name, target);
        }

        Ok(Self { targets })
    }

    /// The parsed `name -> Target` mapping.
    pub fn targets(&self) -> &IndexMap<String, Target> {
        &self.targets
    }

    /// Consume the workflow, returning its targets.
    pub fn into_targets(self) -> IndexMap<String, Target> {
        self.targets
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
