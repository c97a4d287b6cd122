// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The heterogeneous input/output shapes a [`crate::Target`] accepts, and
//! their deterministic flattening into an ordered sequence of absolute
//! paths — the only form the rest of the core ever reads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single path, an ordered sequence of paths, or a label -> path mapping.
///
/// All three shapes flatten to the same thing: a deterministically ordered
/// `Vec<PathBuf>` of absolute paths. `Mapping` uses an `IndexMap` rather
/// than a `HashMap` specifically so its flattened order matches declaration
/// order, not hash order — staleness comparisons must be reproducible
/// across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathCollection {
    Single(PathBuf),
    Sequence(Vec<PathBuf>),
    Mapping(IndexMap<String, PathBuf>),
}

impl PathCollection {
    /// Flatten into an absolute, deterministically ordered path sequence.
    ///
    /// Relative paths are resolved against `working_dir`, which must
    /// itself be absolute.
    pub fn flatten(&self, working_dir: &Path) -> Vec<PathBuf> {
        let resolve = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                working_dir.join(p)
            }
        };
        match self {
            PathCollection::Single(p) => vec![resolve(p)],
            PathCollection::Sequence(paths) => paths.iter().map(|p| resolve(p)).collect(),
            PathCollection::Mapping(map) => map.values().map(|p| resolve(p)).collect(),
        }
    }

    /// An empty collection, used as the default for targets with no inputs
    /// or outputs (sources and sinks).
    pub fn empty() -> Self {
        PathCollection::Sequence(Vec::new())
    }
}

impl From<PathBuf> for PathCollection {
    fn from(p: PathBuf) -> Self {
        PathCollection::Single(p)
    }
}

impl From<Vec<PathBuf>> for PathCollection {
    fn from(paths: Vec<PathBuf>) -> Self {
        PathCollection::Sequence(paths)
    }
}

impl From<IndexMap<String, PathBuf>> for PathCollection {
    fn from(map: IndexMap<String, PathBuf>) -> Self {
        PathCollection::Mapping(map)
    }
}

#[cfg(test)]
#[path = "path_collection_tests.rs"]
mod tests;
