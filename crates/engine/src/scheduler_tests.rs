// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::FakeBackend;
use flowctl_core::test_support::target;
use flowctl_storage::MemoryStateStore;
use std::fs;
use std::time::{Duration, SystemTime};

fn touch(path: &std::path::Path, when: SystemTime) {
    fs::write(path, b"x").unwrap();
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(when).unwrap();
}

#[tokio::test]
async fn should_run_is_true_for_missing_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let t = flowctl_core::test_support::target_in(
        dir.path().to_str().unwrap(),
        "a",
        &[],
        &["out.txt"],
    );
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    assert!(scheduler.should_run(idx).unwrap());
    let _ = out;
}

#[tokio::test]
async fn should_run_is_false_when_output_newer_than_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    let base = SystemTime::now() - Duration::from_secs(60);
    touch(&input, base);
    touch(&output, base + Duration::from_secs(10));

    let t = flowctl_core::test_support::target_in(
        dir.path().to_str().unwrap(),
        "a",
        &["in.txt"],
        &["out.txt"],
    );
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    assert!(!scheduler.should_run(idx).unwrap());
}

#[tokio::test]
async fn should_run_is_true_on_strict_tie() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    let same = SystemTime::now();
    touch(&input, same);
    touch(&output, same);

    let t = flowctl_core::test_support::target_in(
        dir.path().to_str().unwrap(),
        "a",
        &["in.txt"],
        &["out.txt"],
    );
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    assert!(!scheduler.should_run(idx).unwrap());
}

#[tokio::test]
async fn should_run_propagates_from_stale_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    let mid = dir.path().join("mid.out");
    let out = dir.path().join("final.out");
    let now = SystemTime::now();
    touch(&mid, now);
    touch(&out, now + Duration::from_secs(5));

    let upstream = flowctl_core::test_support::target_in(root, "upstream", &[], &["mid.out"]);
    let downstream =
        flowctl_core::test_support::target_in(root, "downstream", &["mid.out"], &["final.out"]);
    let graph = Graph::from_targets(vec![upstream, downstream]).unwrap();
    let downstream_idx = graph.idx_of("downstream").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    assert!(scheduler.should_run(downstream_idx).unwrap());
}

#[tokio::test]
async fn should_run_errors_on_missing_unresolved_input() {
    let t = target("a", &["missing.txt"], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let err = scheduler.should_run(idx).unwrap_err();
    assert!(matches!(err, EngineError::RequiredFileMissing { .. }));
}

#[tokio::test]
async fn should_run_memoizes_result() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let first = scheduler.should_run(idx).unwrap();
    let second = scheduler.should_run(idx).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn update_state_resets_dependent_when_dependency_failed() {
    let upstream = target("upstream", &[], &["mid.out"]);
    let downstream = target("downstream", &["mid.out"], &["final.out"]);
    let graph = Graph::from_targets(vec![upstream, downstream]).unwrap();
    let upstream_idx = graph.idx_of("upstream").unwrap();
    let downstream_idx = graph.idx_of("downstream").unwrap();

    let store = MemoryStateStore::new();
    store.seed("upstream", TargetState::Failed);
    store.seed("downstream", TargetState::Completed);
    let scheduler = Scheduler::new(graph, store, FakeBackend::new(), false);

    let state = scheduler.update_state(downstream_idx).await.unwrap();
    assert_eq!(state, TargetState::Unknown);
    let upstream_state = scheduler.update_state(upstream_idx).await.unwrap();
    assert_eq!(upstream_state, TargetState::Failed);
}

#[tokio::test]
async fn update_state_reconciles_submitted_against_backend_liveness() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();

    let store = MemoryStateStore::new();
    store.seed("a", TargetState::Submitted);
    let backend = FakeBackend::new();
    backend.set_liveness("a", Liveness::Running);
    let scheduler = Scheduler::new(graph, store, backend, false);

    let state = scheduler.update_state(idx).await.unwrap();
    assert_eq!(state, TargetState::Running);
}

#[tokio::test]
async fn update_state_resets_when_backend_has_lost_the_job() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();

    let store = MemoryStateStore::new();
    store.seed("a", TargetState::Submitted);
    let scheduler = Scheduler::new(graph, store, FakeBackend::new(), false);

    let state = scheduler.update_state(idx).await.unwrap();
    assert_eq!(state, TargetState::Unknown);
}

#[tokio::test]
async fn update_state_completes_when_backend_reports_done() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();

    let store = MemoryStateStore::new();
    store.seed("a", TargetState::Submitted);
    let backend = FakeBackend::new();
    backend.set_liveness("a", Liveness::Done);
    let scheduler = Scheduler::new(graph, store, backend, false);

    let state = scheduler.update_state(idx).await.unwrap();
    assert_eq!(state, TargetState::Completed);
}

#[tokio::test]
async fn update_state_is_memoized() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let store = MemoryStateStore::new();
    store.seed("a", TargetState::Submitted);
    let backend = FakeBackend::new();
    backend.set_liveness("a", Liveness::Running);
    let scheduler = Scheduler::new(graph, store, backend, false);

    let first = scheduler.update_state(idx).await.unwrap();
    let second = scheduler.update_state(idx).await.unwrap();
    assert_eq!(first, second);
    let liveness_calls = scheduler
        .backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, crate::test_support::BackendCall::Liveness { .. }))
        .count();
    assert_eq!(liveness_calls, 1);
}

#[tokio::test]
async fn status_resolves_unknown_and_stale_to_should_run() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let status = scheduler.status(idx).await.unwrap();
    assert_eq!(status, TargetStatus::ShouldRun);
}

#[tokio::test]
async fn schedule_submits_a_stale_source_target() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let store = MemoryStateStore::new();
    let backend = FakeBackend::new();
    let scheduler = Scheduler::new(graph, store, backend, false);

    let submitted = scheduler.schedule(idx).await.unwrap();
    assert!(submitted);
    match &scheduler.backend.calls()[0] {
        crate::test_support::BackendCall::Submit { target, .. } => assert_eq!(target, "a"),
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn schedule_does_not_resubmit_already_submitted_target() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let store = MemoryStateStore::new();
    store.seed("a", TargetState::Submitted);
    let backend = FakeBackend::new();
    backend.set_liveness("a", Liveness::Queued);
    let scheduler = Scheduler::new(graph, store, backend, false);

    let submitted = scheduler.schedule(idx).await.unwrap();
    assert!(submitted);
    let submit_calls = scheduler
        .backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, crate::test_support::BackendCall::Submit { .. }))
        .count();
    assert_eq!(submit_calls, 0);
}

#[tokio::test]
async fn schedule_runs_dependent_when_dependency_runs() {
    let upstream = target("upstream", &[], &["mid.out"]);
    let downstream = target("downstream", &["mid.out"], &["final.out"]);
    let graph = Graph::from_targets(vec![upstream, downstream]).unwrap();
    let downstream_idx = graph.idx_of("downstream").unwrap();
    let scheduler = Scheduler::new(
        graph,
        MemoryStateStore::new(),
        FakeBackend::new(),
        false,
    );

    let submitted = scheduler.schedule(downstream_idx).await.unwrap();
    assert!(submitted);

    let calls = scheduler.backend.calls();
    let submitted_names: Vec<String> = calls
        .into_iter()
        .filter_map(|c| match c {
            crate::test_support::BackendCall::Submit { target, .. } => Some(target),
            _ => None,
        })
        .collect();
    assert_eq!(submitted_names, vec!["upstream", "downstream"]);
}

#[tokio::test]
async fn schedule_submits_shared_dependency_exactly_once_in_a_diamond() {
    // s -> a -> t
    // s -> b -> t
    let s = target("s", &[], &["s.out"]);
    let a = target("a", &["s.out"], &["a.out"]);
    let b = target("b", &["s.out"], &["b.out"]);
    let t = target("t", &["a.out", "b.out"], &["t.out"]);
    let graph = Graph::from_targets(vec![s, a, b, t]).unwrap();
    let t_idx = graph.idx_of("t").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let submitted = scheduler.schedule(t_idx).await.unwrap();
    assert!(submitted);

    let calls = scheduler.backend.calls();
    let submitted_names: Vec<String> = calls
        .into_iter()
        .filter_map(|c| match c {
            crate::test_support::BackendCall::Submit { target, .. } => Some(target),
            _ => None,
        })
        .collect();

    // Every target submitted exactly once, even though "s" is reached via
    // two independent paths (through "a" and through "b").
    assert_eq!(submitted_names.len(), 4);
    assert_eq!(submitted_names.iter().filter(|n| n.as_str() == "s").count(), 1);

    let pos = |name: &str| submitted_names.iter().position(|n| n == name).unwrap();
    assert!(pos("s") < pos("a"));
    assert!(pos("s") < pos("b"));
    assert!(pos("a") < pos("t"));
    assert!(pos("b") < pos("t"));
}

#[tokio::test]
async fn schedule_skips_up_to_date_leaf_with_no_stale_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    let base = SystemTime::now() - Duration::from_secs(60);
    touch(&input, base);
    touch(&output, base + Duration::from_secs(10));

    let t = flowctl_core::test_support::target_in(root, "a", &["in.txt"], &["out.txt"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let submitted = scheduler.schedule(idx).await.unwrap();
    assert!(!submitted);
    assert!(scheduler.backend.calls().is_empty());
}

#[tokio::test]
async fn dry_run_pretends_to_submit_without_touching_backend() {
    let t = target("a", &[], &["a.out"]);
    let graph = Graph::from_targets(vec![t]).unwrap();
    let idx = graph.idx_of("a").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), true);

    let submitted = scheduler.schedule(idx).await.unwrap();
    assert!(submitted);
    assert!(scheduler
        .backend
        .calls()
        .iter()
        .all(|c| !matches!(c, crate::test_support::BackendCall::Submit { .. })));
}

#[tokio::test]
async fn schedule_many_preserves_input_order() {
    let a = target("a", &[], &["a.out"]);
    let b = target("b", &[], &["b.out"]);
    let graph = Graph::from_targets(vec![a, b]).unwrap();
    let a_idx = graph.idx_of("a").unwrap();
    let b_idx = graph.idx_of("b").unwrap();
    let scheduler = Scheduler::new(graph, MemoryStateStore::new(), FakeBackend::new(), false);

    let results = scheduler.schedule_many(&[b_idx, a_idx]).await.unwrap();
    assert_eq!(results, vec![true, true]);
}
