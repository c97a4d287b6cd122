// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

#![allow(clippy::expect_used)]

use crate::option_value::OptionValue;
use crate::path_collection::PathCollection;
use crate::target::Target;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Build a target rooted at `/work` with single-path inputs/outputs.
///
/// `inputs`/`outputs` are relative filenames; panics (test-only) if the
/// target name is invalid, since callers always pass literal names.
pub fn target(name: &str, inputs: &[&str], outputs: &[&str]) -> Target {
    target_in("/work", name, inputs, outputs)
}

/// Like [`target`], but rooted at an arbitrary absolute working directory —
/// useful for tests that touch a real `tempfile::tempdir()`.
pub fn target_in(working_dir: &str, name: &str, inputs: &[&str], outputs: &[&str]) -> Target {
    let to_paths = |names: &[&str]| -> PathCollection {
        PathCollection::Sequence(names.iter().map(PathBuf::from).collect())
    };
    Target::new(
        name,
        PathBuf::from(working_dir),
        to_paths(inputs),
        to_paths(outputs),
        IndexMap::new(),
        format!("# {name}"),
    )
    .expect("test target should be valid")
}

/// Like [`target`], with an explicit options map.
pub fn target_with_options(
    name: &str,
    inputs: &[&str],
    outputs: &[&str],
    options: IndexMap<String, OptionValue>,
) -> Target {
    let to_paths = |names: &[&str]| -> PathCollection {
        PathCollection::Sequence(names.iter().map(PathBuf::from).collect())
    };
    Target::new(
        name,
        PathBuf::from("/work"),
        to_paths(inputs),
        to_paths(outputs),
        options,
        format!("# {name}"),
    )
    .expect("test target should be valid")
}
