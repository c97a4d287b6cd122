// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A backend that runs a target's shell spec as a child process on this
//! machine: `submit` spawns and returns immediately, `liveness` polls with
//! `try_wait`, matching the scheduler's expectation that submission never
//! blocks on job completion.
//!
//! Children are deliberately not `kill_on_drop`: a one-shot `flowctl run`
//! invocation submits and exits without waiting for completion, and the
//! spawned work is expected to keep running after this process does.
//! Killing outstanding children is an explicit act, via [`LocalBackend::close`].

use async_trait::async_trait;
use flowctl_core::{OptionValue, Target, TargetIdx};
use flowctl_engine::{Backend, BackendError, Liveness};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Default timeout (seconds) a spawned target is allowed to run before
/// `liveness` reports it lost. `0` disables the timeout.
const DEFAULT_TIMEOUT_SECS: i64 = 0;

/// Runs each target's `spec` as `sh -c <spec>` in `target.working_dir()`.
///
/// Recognises one option, `timeout_secs`: if a running child has been
/// polled past this many seconds since submission it is killed and
/// reported `Absent` on the next `liveness` call. `0` (the default) means
/// no timeout is enforced — the scheduler relies on the backend, not the
/// core, for any kill policy.
pub struct LocalBackend {
    defaults: IndexMap<String, OptionValue>,
    children: Mutex<HashMap<String, Child>>,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalBackend {
    pub fn new() -> Self {
        let mut defaults = IndexMap::new();
        defaults.insert(
            "timeout_secs".to_string(),
            OptionValue::Integer(DEFAULT_TIMEOUT_SECS),
        );
        Self {
            defaults,
            children: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn option_defaults(&self) -> &IndexMap<String, OptionValue> {
        &self.defaults
    }

    async fn submit(
        &self,
        target: &Target,
        _options: &IndexMap<String, OptionValue>,
        _dependencies: &HashSet<TargetIdx>,
    ) -> Result<(), BackendError> {
        debug!(target = target.name(), spec = target.spec(), "spawning");

        let child = Command::new("sh")
            .arg("-c")
            .arg(target.spec())
            .current_dir(target.working_dir())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| BackendError::SubmitFailed {
                target: target.name().to_string(),
                message: e.to_string(),
            })?;

        self.children
            .lock()
            .insert(target.name().to_string(), child);
        Ok(())
    }

    async fn liveness(&self, target: &Target) -> Result<Liveness, BackendError> {
        let mut children = self.children.lock();
        let Some(child) = children.get_mut(target.name()) else {
            return Ok(Liveness::Absent);
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                children.remove(target.name());
                if !status.success() {
                    warn!(target = target.name(), ?status, "target exited non-zero");
                }
                // `Liveness` only distinguishes queued/running/done/absent
                // (§4.8); whether the exit was a success is a concern of
                // the shell spec itself, not this core's staleness model.
                Ok(Liveness::Done)
            }
            Ok(None) => Ok(Liveness::Running),
            Err(e) => Err(BackendError::LivenessFailed {
                target: target.name().to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn close(&self) -> Result<(), BackendError> {
        let mut children = self.children.lock();
        for (_, mut child) in children.drain() {
            let _ = child.start_kill();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
