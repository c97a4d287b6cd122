// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory, non-durable [`StateStore`] for tests that don't want
//! filesystem I/O.

use crate::error::StateStoreError;
use crate::store::{StateStore, TargetMeta};
use flowctl_core::TargetState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Arc<Mutex<HashMap<String, TargetState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a target's state directly, bypassing the transition API.
    pub fn seed(&self, name: &str, state: TargetState) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), state);
    }
}

impl StateStore for MemoryStateStore {
    type Meta = MemoryTargetMeta;

    fn get_target_meta(&self, name: &str) -> Result<Self::Meta, StateStoreError> {
        let current = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .copied()
            .unwrap_or_default();
        Ok(MemoryTargetMeta {
            state: Arc::clone(&self.state),
            target: name.to_string(),
            current,
            pending: None,
        })
    }

    fn close(self) -> Result<(), StateStoreError> {
        Ok(())
    }
}

pub struct MemoryTargetMeta {
    state: Arc<Mutex<HashMap<String, TargetState>>>,
    target: String,
    current: TargetState,
    pending: Option<TargetState>,
}

impl MemoryTargetMeta {
    fn apply(&mut self, state: TargetState, autocommit: bool) -> Result<(), StateStoreError> {
        self.current = state;
        if autocommit {
            self.state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(self.target.clone(), state);
        } else {
            self.pending = Some(state);
        }
        Ok(())
    }
}

impl TargetMeta for MemoryTargetMeta {
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
        self.apply(TargetState::Unknown, autocommit)
    }

    fn submitted(&mut self, autocommit: bool) -> Result<(), StateStoreError> {
        self.apply(TargetState::Submitted, autocommit)
    }

    fn mark(&mut self, state: TargetState, autocommit: bool) -> Result<(), StateStoreError> {
        self.apply(state, autocommit)
    }

    fn commit(&mut self) -> Result<(), StateStoreError> {
        if let Some(state) = self.pending.take() {
            self.state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(self.target.clone(), state);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
