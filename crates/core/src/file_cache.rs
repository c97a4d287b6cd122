// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lazy, memoising file-system probe.
//!
//! A single scheduling pass may read the same path dozens of times;
//! staleness decisions must be consistent within one pass even if the
//! filesystem changes mid-run, so each path is stat'd at most once per
//! cache instance.

use crate::error::FileInfoCacheError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Modification state of a path, as last observed by a [`FileInfoCache`].
///
/// `SystemTime` values are platform-defined and only ever compared
/// pairwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Modified(SystemTime),
    Missing,
}

impl FileState {
    pub fn is_missing(&self) -> bool {
        matches!(self, FileState::Missing)
    }

    pub fn modified(&self) -> Option<SystemTime> {
        match self {
            FileState::Modified(t) => Some(*t),
            FileState::Missing => None,
        }
    }
}

/// Memoising path -> modification-state probe.
///
/// Only a `NotFound` I/O error is treated as "missing"; any other I/O
/// error (e.g. a permissions failure) is surfaced rather than silently
/// treated as an absent file.
#[derive(Debug, Default)]
pub struct FileInfoCache {
    cache: RefCell<HashMap<PathBuf, FileState>>,
}

impl FileInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all memoized results, e.g. before starting a new scheduling
    /// pass over a filesystem that may have changed.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Probe `path`, reusing a prior result for the lifetime of this cache.
    pub fn probe(&self, path: &Path) -> Result<FileState, FileInfoCacheError> {
        if let Some(state) = self.cache.borrow().get(path) {
            return Ok(*state);
        }

        let state = match std::fs::metadata(path) {
            Ok(meta) => FileState::Modified(
                meta.modified()
                    .map_err(|source| FileInfoCacheError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?,
            ),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => FileState::Missing,
            Err(source) => {
                return Err(FileInfoCacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        self.cache
            .borrow_mut()
            .insert(path.to_path_buf(), state);
        Ok(state)
    }
}

#[cfg(test)]
#[path = "file_cache_tests.rs"]
mod tests;
