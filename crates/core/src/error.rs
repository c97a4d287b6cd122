// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced by the core data model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a [`crate::Target`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error(
        "target name {name:?} is invalid: names must match [A-Za-z_][A-Za-z0-9_.]*"
    )]
    InvalidName { name: String },
    #[error("target {name:?} has a non-absolute working_dir: {working_dir}")]
    RelativeWorkingDir { name: String, working_dir: PathBuf },
}

/// Errors raised while building or traversing a [`crate::Graph`].
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("file {path:?} provided by targets {first:?} and {second:?}")]
    MultiProvider {
        path: PathBuf,
        first: String,
        second: String,
    },
    #[error("target {name:?} participates in a circular dependency")]
    Cyclic { name: String },
}

/// Errors raised while probing the file system through a [`crate::FileInfoCache`].
#[derive(Debug, Error)]
pub enum FileInfoCacheError {
    #[error("failed to stat {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
