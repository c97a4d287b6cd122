// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic materialization of target state, for crash recovery without a
//! full WAL replay.
//!
//! A snapshot records the WAL sequence number it was taken at; recovery
//! loads the snapshot and replays only the WAL entries after that sequence.

use crate::error::StateStoreError;
use chrono::{DateTime, Utc};
use flowctl_core::TargetState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub seq: u64,
    pub state: HashMap<String, TargetState>,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, state: HashMap<String, TargetState>) -> Self {
        Self {
            seq,
            state,
            created_at: Utc::now(),
        }
    }

    /// Write atomically: serialize to a temp file, fsync it, rename into
    /// place, then fsync the containing directory so the rename itself is
    /// durable.
    pub fn save(&self, path: &Path) -> Result<(), StateStoreError> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        let dir = File::open(parent)?;
        dir.sync_all()?;
        Ok(())
    }

    /// Load the snapshot at `path`, if present. A corrupt snapshot is
    /// rotated to `.bak` rather than treated as fatal; the caller falls
    /// back to a full WAL replay from sequence zero.
    pub fn load(path: &Path) -> Result<Option<Self>, StateStoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                let bak_path = rotate_bak_path(path);
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt snapshot, moving to .bak and replaying from the WAL",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
