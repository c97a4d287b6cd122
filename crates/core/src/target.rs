// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The immutable target descriptor.

use crate::error::TargetError;
use crate::option_value::OptionValue;
use crate::path_collection::PathCollection;
use indexmap::IndexMap;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Returns whether `name` matches `[A-Za-z_][A-Za-z0-9_.]*`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A named unit of work with declared input and output file paths and an
/// opaque shell script body.
///
/// `Target` is immutable: `flattened_inputs`/`flattened_outputs` are pure
/// derived views, computed once and cached. Option normalization does not
/// mutate a target in place; the scheduler stores normalized options on its
/// own side, keyed by target, which keeps targets reusable across scheduler
/// instances and leaves room for parallel scheduling later.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    working_dir: PathBuf,
    inputs: PathCollection,
    outputs: PathCollection,
    options: IndexMap<String, OptionValue>,
    spec: String,
    flattened_inputs: OnceCell<Vec<PathBuf>>,
    flattened_outputs: OnceCell<Vec<PathBuf>>,
}

impl Target {
    /// Construct a target.
    ///
    /// `working_dir` must be absolute — the core has no way to resolve a
    /// relative one on the caller's behalf.
    pub fn new(
        name: impl Into<String>,
        working_dir: PathBuf,
        inputs: PathCollection,
        outputs: PathCollection,
        options: IndexMap<String, OptionValue>,
        spec: impl Into<String>,
    ) -> Result<Self, TargetError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(TargetError::InvalidName { name });
        }
        if !working_dir.is_absolute() {
            return Err(TargetError::RelativeWorkingDir { name, working_dir });
        }
        Ok(Self {
            name,
            working_dir,
            inputs,
            outputs,
            options,
            spec: spec.into(),
            flattened_inputs: OnceCell::new(),
            flattened_outputs: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn options(&self) -> &IndexMap<String, OptionValue> {
        &self.options
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Flattened, ordered sequence of absolute input paths.
    pub fn flattened_inputs(&self) -> &[PathBuf] {
        self.flattened_inputs
            .get_or_init(|| self.inputs.flatten(&self.working_dir))
    }

    /// Flattened, ordered sequence of absolute output paths.
    pub fn flattened_outputs(&self) -> &[PathBuf] {
        self.flattened_outputs
            .get_or_init(|| self.outputs.flatten(&self.working_dir))
    }

    /// A target with no input files.
    pub fn is_source(&self) -> bool {
        self.flattened_inputs().is_empty()
    }

    /// A target with no output files; always stale when reached.
    pub fn is_sink(&self) -> bool {
        self.flattened_outputs().is_empty()
    }

    /// Fill in any option key absent from this target's options from
    /// `defaults`, without overwriting an explicit value.
    pub fn inherit_options(&mut self, defaults: &IndexMap<String, OptionValue>) {
        for (key, value) in defaults {
            self.options
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Target {}

impl std::hash::Hash for Target {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
