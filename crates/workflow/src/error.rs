// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced while loading a `flowctl.toml` workflow file.

use flowctl_core::TargetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to read workflow file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse workflow file {path:?}: {source}")]
    Toml {
        path: std::path::PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("invalid target declared in workflow: {0}")]
    Target(#[from] TargetError),
    #[error("target {name:?} declared more than once in the same workflow file")]
    DuplicateTarget { name: String },
}
