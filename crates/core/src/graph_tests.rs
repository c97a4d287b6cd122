// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::path_collection::PathCollection;
use crate::target::Target;
use crate::test_support::target;
use indexmap::IndexMap;

#[test]
fn dependencies_and_dependents_are_inverse() {
    // b depends on a, c depends on b.
    let graph = Graph::from_targets([
        target("a", &[], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
        target("c", &["b.out"], &["c.out"]),
    ])
    .unwrap();

    let a = graph.idx_of("a").unwrap();
    let b = graph.idx_of("b").unwrap();
    let c = graph.idx_of("c").unwrap();

    assert!(graph.dependencies(b).contains(&a));
    assert!(graph.dependents(a).contains(&b));
    assert!(graph.dependencies(c).contains(&b));
    assert!(graph.dependents(b).contains(&c));
    assert!(graph.dependencies(a).is_empty());
    assert!(graph.dependents(c).is_empty());
}

#[test]
fn unresolved_inputs_are_recorded_without_error() {
    let graph = Graph::from_targets([target("only", &["missing.txt"], &["out.txt"])]).unwrap();
    assert_eq!(graph.unresolved().len(), 1);
    assert!(graph.is_unresolved(&PathBuf::from("/work/missing.txt")));
}

#[test]
fn duplicate_output_path_is_rejected() {
    let err = Graph::from_targets([
        target("first", &[], &["shared.out"]),
        target("second", &[], &["shared.out"]),
    ])
    .unwrap_err();

    match err {
        GraphError::MultiProvider { first, second, .. } => {
            assert_eq!(first, "first");
            assert_eq!(second, "second");
        }
        other => panic!("expected MultiProvider, got {other:?}"),
    }
}

#[test]
fn direct_cycle_is_rejected() {
    let err = Graph::from_targets([
        target("a", &["b.out"], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::Cyclic { .. }));
}

#[test]
fn self_cycle_is_rejected() {
    let err = Graph::from_targets([target("a", &["a.out"], &["a.out"])]).unwrap_err();
    assert!(matches!(err, GraphError::Cyclic { .. }));
}

#[test]
fn longer_cycle_is_rejected() {
    let err = Graph::from_targets([
        target("a", &["c.out"], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
        target("c", &["b.out"], &["c.out"]),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::Cyclic { .. }));
}

#[test]
fn endpoints_are_targets_with_no_dependents() {
    // c -> b -> a, and an unrelated standalone node d.
    let graph = Graph::from_targets([
        target("a", &[], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
        target("c", &["b.out"], &["c.out"]),
        target("d", &[], &["d.out"]),
    ])
    .unwrap();

    let endpoints = graph.endpoints();
    let names: HashSet<&str> = endpoints
        .iter()
        .map(|&idx| graph.target(idx).name())
        .collect();
    assert_eq!(names, HashSet::from(["c", "d"]));
}

#[test]
fn dfs_is_post_order_and_visits_each_node_once() {
    let graph = Graph::from_targets([
        target("a", &[], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
        target("c", &["a.out"], &["c.out"]),
        target("d", &["b.out", "c.out"], &["d.out"]),
    ])
    .unwrap();

    let d = graph.idx_of("d").unwrap();
    let order = graph.dfs(d);

    // Every node appears exactly once.
    let mut seen = HashSet::new();
    for &idx in order {
        assert!(seen.insert(idx), "node visited twice");
    }
    assert_eq!(seen.len(), 4);

    // A dependency must appear before everything that depends on it.
    let position = |name: &str| -> usize {
        order
            .iter()
            .position(|&idx| graph.target(idx).name() == name)
            .unwrap()
    };
    assert!(position("a") < position("b"));
    assert!(position("a") < position("c"));
    assert!(position("b") < position("d"));
    assert!(position("c") < position("d"));
    assert_eq!(position("d"), 3, "root is visited last in post-order");
}

#[test]
fn dfs_result_is_memoized() {
    let graph = Graph::from_targets([
        target("a", &[], &["a.out"]),
        target("b", &["a.out"], &["b.out"]),
    ])
    .unwrap();
    let b = graph.idx_of("b").unwrap();
    let first: Vec<TargetIdx> = graph.dfs(b).to_vec();
    let second: Vec<TargetIdx> = graph.dfs(b).to_vec();
    assert_eq!(first, second);
}

fn chain_of(len: usize) -> Vec<Target> {
    (0..len)
        .map(|i| {
            let inputs = if i == 0 {
                PathCollection::empty()
            } else {
                PathCollection::Single(PathBuf::from(format!("t{}.out", i - 1)))
            };
            let outputs = PathCollection::Single(PathBuf::from(format!("t{i}.out")));
            Target::new(
                format!("t{i}"),
                PathBuf::from("/work"),
                inputs,
                outputs,
                IndexMap::new(),
                "# chain",
            )
            .unwrap()
        })
        .collect()
}

proptest::proptest! {
    #[test]
    fn dependents_of_dependencies_always_include_self(chain_len in 1usize..8) {
        let graph = Graph::from_targets(chain_of(chain_len)).unwrap();
        for i in 0..chain_len {
            let idx = graph.idx_of(&format!("t{i}")).unwrap();
            for &dep in graph.dependencies(idx) {
                prop_assert!(graph.dependents(dep).contains(&idx));
            }
        }
    }
}
