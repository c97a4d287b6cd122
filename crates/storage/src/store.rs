// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `StateStore`/`TargetMeta` contract and its durable, file-backed
//! implementation.

use crate::error::StateStoreError;
use crate::event::{Op, StateEvent};
use crate::snapshot::Snapshot;
use crate::wal::Wal;
use flowctl_core::TargetState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A handle that hands out per-target execution-state records.
pub trait StateStore: Send + Sync {
    type Meta: TargetMeta;

    fn get_target_meta(&self, name: &str) -> Result<Self::Meta, StateStoreError>;
    fn close(self) -> Result<(), StateStoreError>;
}

/// A single target's persisted execution state, and the transitions it can
/// record.
pub trait TargetMeta {
    fn is_unknown(&self) -> bool;
    fn is_submitted(&self) -> bool;
    fn is_running(&self) -> bool;
    fn is_completed(&self) -> bool;
    fn is_failed(&self) -> bool;
    fn is_cancelled(&self) -> bool;
    fn is_killed(&self) -> bool;

    /// Force the target back to `Unknown`, e.g. because a dependency
    /// changed.
    fn reset(&mut self, autocommit: bool) -> Result<(), StateStoreError>;
    /// Record that the target has been handed to a backend.
    fn submitted(&mut self, autocommit: bool) -> Result<(), StateStoreError>;
    /// Record an arbitrary state, driven by a backend liveness observation.
    fn mark(&mut self, state: TargetState, autocommit: bool) -> Result<(), StateStoreError>;
    /// Apply any transitions buffered with `autocommit = false`, as a
    /// single durable unit.
    fn commit(&mut self) -> Result<(), StateStoreError>;
}

/// Number of committed operations between automatic snapshots. Kept small
/// since a target run typically touches a few hundred targets at most.
const SNAPSHOT_INTERVAL_OPS: u64 = 200;

struct Inner {
    wal: Wal,
    state: HashMap<String, TargetState>,
    dir: PathBuf,
    snapshot_seq: u64,
    ops_since_snapshot: u64,
}

impl Inner {
    fn snapshot_path(&self) -> PathBuf {
        self.dir.join("snapshot.json")
    }

    fn maybe_snapshot(&mut self) -> Result<(), StateStoreError> {
        if self.ops_since_snapshot < SNAPSHOT_INTERVAL_OPS {
            return Ok(());
        }
        let seq = self.wal.write_seq();
        let snapshot = Snapshot::new(seq, self.state.clone());
        snapshot.save(&self.snapshot_path())?;
        self.wal.truncate_before(seq + 1)?;
        self.snapshot_seq = seq;
        self.ops_since_snapshot = 0;
        Ok(())
    }

    fn apply_and_append(&mut self, events: &[StateEvent]) -> Result<(), StateStoreError> {
        for event in events {
            self.wal.append(event.clone())?;
        }
        self.wal.flush()?;
        for event in events {
            event.apply_to(&mut self.state);
        }
        self.ops_since_snapshot += events.len() as u64;
        self.maybe_snapshot()
    }
}

/// A durable, crash-recoverable [`StateStore`] backed by a JSONL
/// write-ahead log and periodic snapshots.
pub struct FileStateStore {
    inner: Arc<Mutex<Inner>>,
}

impl FileStateStore {
    /// Open (or create) a state store rooted at `dir`. Loads the latest
    /// snapshot, if any, then replays WAL entries after its sequence
    /// number to rebuild the in-memory map.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let snapshot = Snapshot::load(&dir.join("snapshot.json"))?;
        let (snapshot_seq, mut state) = match snapshot {
            Some(s) => (s.seq, s.state),
            None => (0, HashMap::new()),
        };

        let wal = Wal::open(&dir.join("wal.jsonl"))?;
        for entry in wal.entries_after(snapshot_seq)? {
            entry.event.apply_to(&mut state);
        }

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                wal,
                state,
                dir,
                snapshot_seq,
                ops_since_snapshot: 0,
            })),
        })
    }

    fn current_state(&self, target: &str) -> TargetState {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.state.get(target).copied().unwrap_or_default()
    }
}

impl StateStore for FileStateStore {
    type Meta = FileTargetMeta;

    fn get_target_meta(&self, name: &str) -> Result<Self::Meta, StateStoreError> {
        Ok(FileTargetMeta {
            inner: Arc::clone(&self.inner),
            target: name.to_string(),
            current: self.current_state(name),
            pending: Vec::new(),
        })
    }

    fn close(self) -> Result<(), StateStoreError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        inner.wal.flush()?;
        let seq = inner.wal.write_seq();
        let snapshot = Snapshot::new(seq, inner.state.clone());
        let path = inner.snapshot_path();
        snapshot.save(&path)?;
        inner.snapshot_seq = seq;
        Ok(())
    }
}

/// A single target's state handle over a [`FileStateStore`].
pub struct FileTargetMeta {
    inner: Arc<Mutex<Inner>>,
    target: String,
    current: TargetState,
    pending: Vec<Op>,
}

impl FileTargetMeta {
    fn apply(&mut self, op: Op, autocommit: bool) -> Result<(), StateStoreError> {
        self.current = match &op {
            Op::Reset => TargetState::Unknown,
            Op::Submitted => TargetState::Submitted,
            Op::Mark(s) => *s,
        };
        if autocommit {
            let event = StateEvent {
                target: self.target.clone(),
                op,
            };
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.apply_and_append(std::slice::from_ref(&event))
        } else {
            self.pending.push(op);
            Ok(())
        }
    }
}

impl TargetMeta for FileTargetMeta {
    fn is_unknown(&self) -> bool {
        self.current.is_unknown()
    }

    fn is_submitted(&self) -> bool {
        self.current.is_submitted()
    }

    fn is_running(&self) -> bool {
        self.current.is_running()
    }

    fn is_completed(&self) -> bool {
        self.current.is_completed()
    }

    fn is_failed(&self) -> bool {
        self.current.is_failed()
    }

    fn is_cancelled(&self) -> bool {
        self.current.is_cancelled()
    }

    fn is_killed(&self) -> bool {
        self.current.is_killed()
    }

    fn reset(&mut self, autocommit: bool) -> Result<(), StateStoreError> {
        self.apply(Op::Reset, autocommit)
    }

    fn submitted(&mut self, autocommit: bool) -> Result<(), StateStoreError> {
        self.apply(Op::Submitted, autocommit)
    }

    fn mark(&mut self, state: TargetState, autocommit: bool) -> Result<(), StateStoreError> {
        self.apply(Op::Mark(state), autocommit)
    }

    fn commit(&mut self) -> Result<(), StateStoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let events: Vec<StateEvent> = self
            .pending
            .drain(..)
            .map(|op| StateEvent {
                target: self.target.clone(),
                op,
            })
            .collect();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.apply_and_append(&events)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
