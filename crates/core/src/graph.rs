// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dependency graph: file-flow inference, multi-provider detection,
//! cycle detection and traversal.

use crate::error::GraphError;
use crate::target::Target;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// A dense integer handle for a [`Target`] within one [`Graph`].
///
/// Rather than represent adjacency as `Target -> HashSet<Target>`, each
/// target is interned to a small integer at graph construction, and every
/// derived map (`provides`, `dependencies`, `dependents`, `unresolved`, the
/// scheduler's memo tables) is keyed by that integer instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetIdx(u32);

impl TargetIdx {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The dependency graph for a set of targets.
///
/// Immutable after construction. Construction runs a two-pass algorithm:
/// first every output path is recorded in `provides` (detecting
/// multi-provider conflicts), then every input path is resolved against
/// `provides` or added to `unresolved`; `dependents` is derived by
/// inverting `dependencies`, and a three-colour DFS checks for cycles.
pub struct Graph {
    targets: Vec<Target>,
    name_index: HashMap<String, TargetIdx>,
    provides: HashMap<PathBuf, TargetIdx>,
    dependencies: Vec<HashSet<TargetIdx>>,
    dependents: Vec<HashSet<TargetIdx>>,
    unresolved: HashSet<PathBuf>,
    dfs_memo: Vec<OnceCell<Vec<TargetIdx>>>,
}

impl Graph {
    /// Build a graph from a collection of targets.
    pub fn from_targets(
        targets: impl IntoIterator<Item = Target>,
    ) -> Result<Self, GraphError> {
        let targets: Vec<Target> = targets.into_iter().collect();
        let name_index: HashMap<String, TargetIdx> = targets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name().to_string(), TargetIdx(i as u32)))
            .collect();

        let mut provides: HashMap<PathBuf, TargetIdx> = HashMap::new();
        for (idx, target) in targets.iter().enumerate() {
            let idx = TargetIdx(idx as u32);
            for path in target.flattened_outputs() {
                if let Some(&existing) = provides.get(path) {
                    return Err(GraphError::MultiProvider {
                        path: path.clone(),
                        first: targets[existing.index()].name().to_string(),
                        second: target.name().to_string(),
                    });
                }
                provides.insert(path.clone(), idx);
            }
        }

        let mut dependencies: Vec<HashSet<TargetIdx>> = vec![HashSet::new(); targets.len()];
        let mut unresolved: HashSet<PathBuf> = HashSet::new();
        for (idx, target) in targets.iter().enumerate() {
            for path in target.flattened_inputs() {
                if let Some(&producer) = provides.get(path) {
                    dependencies[idx].insert(producer);
                } else {
                    unresolved.insert(path.clone());
                }
            }
        }

        let mut dependents: Vec<HashSet<TargetIdx>> = vec![HashSet::new(); targets.len()];
        for (idx, deps) in dependencies.iter().enumerate() {
            let idx = TargetIdx(idx as u32);
            for &dep in deps {
                dependents[dep.index()].insert(idx);
            }
        }

        let dfs_memo = (0..targets.len()).map(|_| OnceCell::new()).collect();

        let graph = Self {
            targets,
            name_index,
            provides,
            dependencies,
            dependents,
            unresolved,
            dfs_memo,
        };
        graph.check_for_cycles()?;
        Ok(graph)
    }

    /// Three-colour depth-first cycle check. Self-edges count as cycles.
    /// Deterministic iteration order isn't required for correctness, but
    /// node indices are visited in ascending order for reproducible error
    /// messages.
    fn check_for_cycles(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            Fresh,
            Started,
            Done,
        }

        let mut color = vec![Color::Fresh; self.targets.len()];

        fn visit(
            graph: &Graph,
            node: TargetIdx,
            color: &mut [Color],
        ) -> Result<(), GraphError> {
            color[node.index()] = Color::Started;
            for &dep in &graph.dependencies[node.index()] {
                match color[dep.index()] {
                    Color::Started => {
                        return Err(GraphError::Cyclic {
                            name: graph.targets[node.index()].name().to_string(),
                        })
                    }
                    Color::Fresh => visit(graph, dep, color)?,
                    Color::Done => {}
                }
            }
            color[node.index()] = Color::Done;
            Ok(())
        }

        for i in 0..self.targets.len() {
            let idx = TargetIdx(i as u32);
            if color[idx.index()] == Color::Fresh {
                visit(self, idx, &mut color)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn target(&self, idx: TargetIdx) -> &Target {
        &self.targets[idx.index()]
    }

    pub fn idx_of(&self, name: &str) -> Option<TargetIdx> {
        self.name_index.get(name).copied()
    }

    pub fn dependencies(&self, idx: TargetIdx) -> &HashSet<TargetIdx> {
        &self.dependencies[idx.index()]
    }

    pub fn dependents(&self, idx: TargetIdx) -> &HashSet<TargetIdx> {
        &self.dependents[idx.index()]
    }

    pub fn unresolved(&self) -> &HashSet<PathBuf> {
        &self.unresolved
    }

    pub fn is_unresolved(&self, path: &PathBuf) -> bool {
        self.unresolved.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = TargetIdx> + '_ {
        (0..self.targets.len()).map(|i| TargetIdx(i as u32))
    }

    /// Targets not depended upon by any other target.
    pub fn endpoints(&self) -> Vec<TargetIdx> {
        self.iter()
            .filter(|idx| self.dependents[idx.index()].is_empty())
            .collect()
    }

    /// Post-order traversal of the transitive closure of `root` under
    /// `dependencies`, with each node appearing exactly once. Memoized per
    /// root since the graph is immutable after construction.
    pub fn dfs(&self, root: TargetIdx) -> &[TargetIdx] {
        self.dfs_memo[root.index()].get_or_init(|| {
            let mut visited = vec![false; self.targets.len()];
            let mut path = Vec::new();

            fn walk(
                graph: &Graph,
                node: TargetIdx,
                visited: &mut [bool],
                path: &mut Vec<TargetIdx>,
            ) {
                if visited[node.index()] {
                    return;
                }
                visited[node.index()] = true;
                for &dep in &graph.dependencies[node.index()] {
                    walk(graph, dep, visited, path);
                }
                path.push(node);
            }

            walk(self, root, &mut visited, &mut path);
            path
        })
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
