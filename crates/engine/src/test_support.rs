// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A call-recording [`Backend`] for scheduler tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

#![allow(clippy::expect_used)]

use crate::backend::{Backend, BackendError, Liveness};
use async_trait::async_trait;
use flowctl_core::{OptionValue, Target, TargetIdx};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One recorded call into a [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Submit {
        target: String,
        dependencies: Vec<TargetIdx>,
    },
    Liveness {
        target: String,
    },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<BackendCall>,
    liveness: HashMap<String, Liveness>,
    submit_error: Option<String>,
}

/// Records every `submit`/`liveness` call in order; lets a test drive the
/// reported liveness of a target and inject a one-shot submit failure.
pub struct FakeBackend {
    defaults: IndexMap<String, OptionValue>,
    state: Mutex<FakeState>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            defaults: IndexMap::new(),
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn with_option_defaults(defaults: IndexMap<String, OptionValue>) -> Self {
        Self {
            defaults,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// All calls recorded so far, in call order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Set the liveness a future `liveness()` call for `target` reports.
    /// Absent from this map means [`Liveness::Absent`].
    pub fn set_liveness(&self, target: &str, liveness: Liveness) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .liveness
            .insert(target.to_string(), liveness);
    }

    /// Make the next `submit()` call fail with this message.
    pub fn fail_next_submit(&self, message: &str) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).submit_error = Some(message.to_string());
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn option_defaults(&self) -> &IndexMap<String, OptionValue> {
        &self.defaults
    }

    async fn submit(
        &self,
        target: &Target,
        _options: &IndexMap<String, OptionValue>,
        dependencies: &HashSet<TargetIdx>,
    ) -> Result<(), BackendError> {
        let mut deps: Vec<TargetIdx> = dependencies.iter().copied().collect();
        deps.sort();

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(BackendCall::Submit {
            target: target.name().to_string(),
            dependencies: deps,
        });
        if let Some(message) = state.submit_error.take() {
            return Err(BackendError::SubmitFailed {
                target: target.name().to_string(),
                message,
            });
        }
        state
            .liveness
            .insert(target.name().to_string(), Liveness::Queued);
        Ok(())
    }

    async fn liveness(&self, target: &Target) -> Result<Liveness, BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(BackendCall::Liveness {
            target: target.name().to_string(),
        });
        Ok(state
            .liveness
            .get(target.name())
            .copied()
            .unwrap_or(Liveness::Absent))
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
