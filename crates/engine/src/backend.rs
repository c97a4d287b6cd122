// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The contract a job scheduler (cluster, queue, local shell) must satisfy
//! to receive submissions from a [`crate::Scheduler`].

use async_trait::async_trait;
use flowctl_core::{OptionValue, Target, TargetIdx};
use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("submit failed for {target}: {message}")]
    SubmitFailed { target: String, message: String },
    #[error("liveness check failed for {target}: {message}")]
    LivenessFailed { target: String, message: String },
    #[error("backend close failed: {0}")]
    CloseFailed(String),
}

/// What a backend reports about a previously submitted target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Queued,
    Running,
    Done,
    /// The backend has no record of the target — either it was never
    /// submitted, or the job was lost (evicted, preempted, crashed).
    Absent,
}

/// A place targets get submitted to run.
///
/// Implementations are expected to be cheap to clone or hold behind a
/// shared reference; the scheduler calls these methods from a single
/// logical pass, never concurrently with itself, but a long-lived process
/// may hold the same backend across many passes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Recognised option names and their defaults. Options on a target
    /// outside this set are stripped (with a warning, by the caller);
    /// options explicitly set to null are stripped silently.
    fn option_defaults(&self) -> &IndexMap<String, OptionValue>;

    /// Enqueue `target`, declaring a backend-level dependency on every
    /// target in `dependencies` (all of which have already been submitted
    /// in this pass).
    ///
    /// `options` is the canonicalised option map for this target: explicit
    /// values normalized against [`Backend::option_defaults`], with
    /// unrecognised keys already stripped and defaults filled in — never
    /// `target.options()` directly.
    async fn submit(
        &self,
        target: &Target,
        options: &IndexMap<String, OptionValue>,
        dependencies: &HashSet<TargetIdx>,
    ) -> Result<(), BackendError>;

    /// Query the current state of a previously submitted target.
    async fn liveness(&self, target: &Target) -> Result<Liveness, BackendError>;

    /// Release any resources (connections, temp state) held by the
    /// backend. Called once at the end of a process.
    async fn close(&self) -> Result<(), BackendError>;
}
