// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced while scheduling a target graph.

use crate::backend::BackendError;
use flowctl_core::FileInfoCacheError;
use flowctl_storage::StateStoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("required file {path:?} for target {target:?} is missing and has no producer")]
    RequiredFileMissing { target: String, path: PathBuf },
    #[error("state store error: {0}")]
    StateStore(#[from] StateStoreError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("file probe error: {0}")]
    FileProbe(#[from] FileInfoCacheError),
}
