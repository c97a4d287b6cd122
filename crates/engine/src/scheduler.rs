// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staleness, status resolution and submission scheduling over a target
//! graph, backed by a pluggable [`Backend`] and [`StateStore`].

use crate::backend::{Backend, Liveness};
use crate::error::EngineError;
use flowctl_core::{FileInfoCache, Graph, OptionValue, TargetIdx, TargetState, TargetStatus};
use flowctl_storage::{StateStore, TargetMeta};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// One logical scheduling pass over an immutable [`Graph`].
///
/// A `Scheduler` is not reused across passes that need fresh staleness
/// results: construct a new one (or call [`Scheduler::reset_memos`]) when
/// the filesystem may have changed since the last pass.
pub struct Scheduler<S: StateStore, B: Backend> {
    graph: Graph,
    store: S,
    backend: B,
    cache: FileInfoCache,
    dry_run: bool,
    should_run_memo: RefCell<HashMap<TargetIdx, bool>>,
    update_state_memo: RefCell<HashMap<TargetIdx, TargetState>>,
    normalized_options: RefCell<HashMap<TargetIdx, IndexMap<String, OptionValue>>>,
    pretend_submitted: RefCell<HashSet<TargetIdx>>,
}

impl<S: StateStore, B: Backend> Scheduler<S, B> {
    pub fn new(graph: Graph, store: S, backend: B, dry_run: bool) -> Self {
        Self {
            graph,
            store,
            backend,
            cache: FileInfoCache::new(),
            dry_run,
            should_run_memo: RefCell::new(HashMap::new()),
            update_state_memo: RefCell::new(HashMap::new()),
            normalized_options: RefCell::new(HashMap::new()),
            pretend_submitted: RefCell::new(HashSet::new()),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Drop all per-pass memoization. Call before a new pass if the
    /// filesystem or persisted state may have changed underneath this
    /// scheduler.
    pub fn reset_memos(&self) {
        self.should_run_memo.borrow_mut().clear();
        self.update_state_memo.borrow_mut().clear();
        self.pretend_submitted.borrow_mut().clear();
        self.cache.clear();
    }

    /// Staleness: does `idx` need to run? Pure over the graph and the
    /// file-info cache snapshot this scheduler was constructed with.
    pub fn should_run(&self, idx: TargetIdx) -> Result<bool, EngineError> {
        if let Some(&cached) = self.should_run_memo.borrow().get(&idx) {
            return Ok(cached);
        }

        let target = self.graph.target(idx);

        for &dep in self.graph.dependencies(idx) {
            if self.should_run(dep)? {
                return self.memoize_should_run(idx, true);
            }
        }

        for input in target.flattened_inputs() {
            if self.graph.is_unresolved(input) && self.cache.probe(input)?.is_missing() {
                return Err(EngineError::RequiredFileMissing {
                    target: target.name().to_string(),
                    path: input.clone(),
                });
            }
        }

        if target.is_sink() {
            return self.memoize_should_run(idx, true);
        }

        for output in target.flattened_outputs() {
            if self.cache.probe(output)?.is_missing() {
                return self.memoize_should_run(idx, true);
            }
        }

        if target.is_source() {
            return self.memoize_should_run(idx, false);
        }

        let newest_input = target
            .flattened_inputs()
            .iter()
            .filter_map(|p| self.cache.probe(p).ok().and_then(|s| s.modified()))
            .max();
        let oldest_output = target
            .flattened_outputs()
            .iter()
            .filter_map(|p| self.cache.probe(p).ok().and_then(|s| s.modified()))
            .min();

        let stale = match (newest_input, oldest_output) {
            (Some(yin), Some(yout)) => yin > yout,
            _ => false,
        };
        self.memoize_should_run(idx, stale)
    }

    fn memoize_should_run(&self, idx: TargetIdx, value: bool) -> Result<bool, EngineError> {
        self.should_run_memo.borrow_mut().insert(idx, value);
        Ok(value)
    }

    /// Recursive, post-order dependency-propagated invalidation. If a
    /// dependency's resulting state is `Failed`/`Killed`/`Cancelled`/
    /// `Unknown`, the target's own persisted state is reset to `Unknown`.
    ///
    /// Also the point where a `Submitted`/`Running` target's state is
    /// reconciled against the backend's live view: `Done` completes it,
    /// `Running` marks it running, `Queued` leaves it `Submitted`, and
    /// `Absent` (the backend has lost track of a submitted job) resets it
    /// to `Unknown` so the next pass resubmits it.
    pub fn update_state(&self, idx: TargetIdx) -> Pin<Box<dyn Future<Output = Result<TargetState, EngineError>> + Send + '_>> {
        Box::pin(async move {
            if let Some(&cached) = self.update_state_memo.borrow().get(&idx) {
                return Ok(cached);
            }

            for &dep in self.graph.dependencies(idx) {
                let dep_state = self.update_state(dep).await?;
                if dep_state.forces_dependent_reset() {
                    let target = self.graph.target(idx);
                    let mut meta = self.store.get_target_meta(target.name())?;
                    meta.reset(true)?;
                }
            }

            let target = self.graph.target(idx);
            let mut meta = self.store.get_target_meta(target.name())?;

            if meta.is_submitted() || meta.is_running() {
                match self.backend.liveness(target).await? {
                    Liveness::Done => meta.mark(TargetState::Completed, true)?,
                    Liveness::Running => meta.mark(TargetState::Running, true)?,
                    Liveness::Queued => {}
                    Liveness::Absent => {
                        warn!(target = target.name(), "backend lost track of submitted target, resetting");
                        meta.reset(true)?;
                    }
                }
            }

            let state = current_state(&meta);
            self.update_state_memo.borrow_mut().insert(idx, state);
            Ok(state)
        })
    }

    /// Fuses persisted state with the live staleness decision.
    pub async fn status(&self, idx: TargetIdx) -> Result<TargetStatus, EngineError> {
        let state = self.update_state(idx).await?;
        let should_run = self.should_run(idx)?;
        Ok(TargetStatus::resolve(state, should_run))
    }

    /// Normalise `idx`'s options against the backend's recognised set, and
    /// cache the result scheduler-side (never mutating the `Target`
    /// itself). Recognised keys absent from the target fall back to the
    /// backend's default; unrecognised keys are dropped with a warning;
    /// explicit nulls are dropped silently.
    fn prepare_target_options(&self, idx: TargetIdx) -> IndexMap<String, OptionValue> {
        if let Some(existing) = self.normalized_options.borrow().get(&idx) {
            return existing.clone();
        }

        let target = self.graph.target(idx);
        let defaults = self.backend.option_defaults();
        let mut normalized = IndexMap::new();
        let mut nulled: HashSet<&String> = HashSet::new();

        for (key, value) in target.options() {
            if !defaults.contains_key(key) {
                warn!(target = target.name(), option = key, "dropping unrecognised option");
                continue;
            }
            if value.is_null() {
                nulled.insert(key);
                continue;
            }
            normalized.insert(key.clone(), value.clone());
        }

        for (key, value) in defaults {
            if nulled.contains(key) {
                continue;
            }
            normalized.entry(key.clone()).or_insert_with(|| value.clone());
        }

        self.normalized_options
            .borrow_mut()
            .insert(idx, normalized.clone());
        normalized
    }

    /// Returns `true` iff `idx` was submitted (or pretend-submitted, under
    /// dry-run) during this call or earlier in this pass.
    pub fn schedule(&self, idx: TargetIdx) -> Pin<Box<dyn Future<Output = Result<bool, EngineError>> + Send + '_>> {
        Box::pin(async move {
            let options = self.prepare_target_options(idx);

            let status = self.status(idx).await?;
            if status == TargetStatus::Submitted || self.pretend_submitted.borrow().contains(&idx) {
                return Ok(true);
            }

            let mut deps: Vec<TargetIdx> = self.graph.dependencies(idx).iter().copied().collect();
            deps.sort_by_key(|&d| self.graph.target(d).name().to_string());

            let mut submitted_deps = HashSet::new();
            for dep in deps {
                if self.schedule(dep).await? {
                    submitted_deps.insert(dep);
                }
            }

            let must_run = !submitted_deps.is_empty() || status.forces_dependent_run();
            if !must_run {
                return Ok(false);
            }

            if self.dry_run {
                self.pretend_submitted.borrow_mut().insert(idx);
                return Ok(true);
            }

            let target = self.graph.target(idx);
            let mut meta = self.store.get_target_meta(target.name())?;
            meta.reset(false)?;
            meta.submitted(false)?;
            meta.commit()?;
            // Update the memo before calling the backend, not after: a
            // target's state is durably `Submitted` the instant `commit`
            // returns, so any recursive `schedule` call reached through a
            // second path to this same target (a shared dependency in a
            // diamond) must see that immediately rather than recomputing a
            // stale `Unknown` and resubmitting it.
            self.update_state_memo
                .borrow_mut()
                .insert(idx, TargetState::Submitted);

            self.backend.submit(target, &options, &submitted_deps).await?;
            Ok(true)
        })
    }

    /// Schedule every target in `targets`, preserving input order.
    pub async fn schedule_many(&self, targets: &[TargetIdx]) -> Result<Vec<bool>, EngineError> {
        let mut results = Vec::with_capacity(targets.len());
        for &idx in targets {
            results.push(self.schedule(idx).await?);
        }
        Ok(results)
    }

    /// Consume the scheduler, releasing the state store and backend.
    /// Callers should invoke this once at the end of a pass so both
    /// handles get a chance to flush/close (see the "resource
    /// acquisition" requirements on `StateStore`/`Backend`).
    pub async fn close(self) -> Result<(), EngineError> {
        self.store.close()?;
        self.backend.close().await?;
        Ok(())
    }
}

fn current_state(meta: &impl TargetMeta) -> TargetState {
    if meta.is_completed() {
        TargetState::Completed
    } else if meta.is_failed() {
        TargetState::Failed
    } else if meta.is_cancelled() {
        TargetState::Cancelled
    } else if meta.is_killed() {
        TargetState::Killed
    } else if meta.is_running() {
        TargetState::Running
    } else if meta.is_submitted() {
        TargetState::Submitted
    } else {
        TargetState::Unknown
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
