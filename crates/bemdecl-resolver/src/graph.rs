//! Dependency graph construction and traversal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bemdecl_core::BemEntity;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Strength of a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepKind {
    /// The dependency must come strictly before the dependent.
    Must,
    /// The dependency must be present; its position is free.
    Should,
}

impl fmt::Display for DepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepKind::Must => f.write_str("must"),
            DepKind::Should => f.write_str("should"),
        }
    }
}

/// A node in the dependency graph.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DepNode {
    pub entity: BemEntity,
    /// Provider round in which the entity was first seen; `0` for the
    /// declaration itself.
    pub round: usize,
}

impl fmt::Display for DepNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity)
    }
}

/// Edge label in the dependency graph. Edges point from the dependent to
/// its dependency.
#[derive(Debug, Clone)]
pub struct DepEdge {
    pub kind: DepKind,
    /// Provider round in which the edge was reported.
    pub round: usize,
    /// Global insertion sequence, preserving provider list order.
    seq: usize,
}

/// The dependency graph of one resolution, backed by petgraph.
///
/// Node indices follow discovery order: declaration order first, then the
/// order in which provider rounds reported new entities.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<DepNode, DepEdge>,
    index: HashMap<BemEntity, NodeIndex>,
    roots: Vec<NodeIndex>,
    next_seq: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or retrieve a node. Returns the index and whether it is new.
    pub fn add_node(&mut self, entity: BemEntity, round: usize) -> (NodeIndex, bool) {
        if let Some(&idx) = self.index.get(&entity) {
            return (idx, false);
        }
        let idx = self.graph.add_node(DepNode {
            entity: entity.clone(),
            round,
        });
        self.index.insert(entity, idx);
        (idx, true)
    }

    /// Add a declared entity; roots keep declaration order.
    pub fn add_root(&mut self, entity: BemEntity) -> NodeIndex {
        let (idx, _) = self.add_node(entity, 0);
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
        idx
    }

    /// Add a dependency edge from `from` to `to`. Repeated edges of the same
    /// kind collapse into the first one.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: DepKind, round: usize) {
        if self
            .graph
            .edges_connecting(from, to)
            .any(|e| e.weight().kind == kind)
        {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(from, to, DepEdge { kind, round, seq });
    }

    /// Look up a node by entity.
    pub fn find(&self, entity: &BemEntity) -> Option<NodeIndex> {
        self.index.get(entity).copied()
    }

    /// Get the node data for an index.
    pub fn node(&self, idx: NodeIndex) -> &DepNode {
        &self.graph[idx]
    }

    pub fn entity(&self, idx: NodeIndex) -> &BemEntity {
        &self.graph[idx].entity
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// All node indices in discovery order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Direct dependencies of a node, in the order the provider listed them.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &DepEdge)> {
        let mut deps: Vec<(NodeIndex, &DepEdge)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
            .collect();
        deps.sort_by_key(|(_, e)| e.seq);
        deps
    }

    /// Reverse dependencies (who depends on this node), in edge order.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &DepEdge)> {
        let mut deps: Vec<(NodeIndex, &DepEdge)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.source(), e.weight()))
            .collect();
        deps.sort_by_key(|(_, e)| e.seq);
        deps
    }

    /// Every edge of one kind as `(dependent, dependency)`, in edge order.
    pub fn edges_of_kind(&self, kind: DepKind) -> Vec<(NodeIndex, NodeIndex)> {
        let mut edges: Vec<(usize, NodeIndex, NodeIndex)> = self
            .graph
            .edge_references()
            .filter(|e| e.weight().kind == kind)
            .map(|e| (e.weight().seq, e.source(), e.target()))
            .collect();
        edges.sort_by_key(|(seq, _, _)| *seq);
        edges.into_iter().map(|(_, s, t)| (s, t)).collect()
    }

    /// The last provider round that reported anything.
    pub fn max_round(&self) -> usize {
        self.graph
            .node_weights()
            .map(|n| n.round)
            .max()
            .unwrap_or(0)
    }

    /// Nodes on a `must` cycle through `idx`, in discovery order. Empty when
    /// `idx` is not on a cycle.
    pub fn must_cycle_through(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let must_only = self.graph.filter_map(
            |_, n| Some(n.round),
            |_, e| (e.kind == DepKind::Must).then_some(()),
        );
        for mut component in tarjan_scc(&must_only) {
            if !component.contains(&idx) {
                continue;
            }
            if component.len() == 1 && must_only.find_edge(idx, idx).is_none() {
                return Vec::new();
            }
            component.sort();
            return component;
        }
        Vec::new()
    }

    /// Print the dependency tree below the declared entities.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let mut visited = HashSet::new();
        for &root in &self.roots {
            output.push_str(&format!("{}\n", self.graph[root]));
            visited.insert(root);
            let deps = self.dependencies_of(root);
            let count = deps.len();
            for (i, (child, edge)) in deps.into_iter().enumerate() {
                let is_last = i == count - 1;
                self.print_subtree(&mut output, child, edge.kind, "", is_last, 1, max_depth, &mut visited);
            }
            visited.remove(&root);
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        kind: DepKind,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node} ({kind})\n"));

        if let Some(max) = max_depth {
            if depth >= max {
                return;
            }
        }

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, (child, edge)) in deps.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_subtree(
                output,
                child,
                edge.kind,
                &child_prefix,
                is_last,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Find a path from a declared entity to `target`.
    pub fn find_path(&self, target: &BemEntity) -> Option<Vec<&DepNode>> {
        let target = self.find(target)?;
        for &root in &self.roots {
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            if self.dfs_path(root, target, &mut path, &mut visited) {
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
        }
        None
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for (child, _) in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Print who depends on `target`, transitively.
    pub fn print_inverted_tree(&self, target: &BemEntity) -> String {
        let mut output = String::new();
        let Some(idx) = self.find(target) else {
            return output;
        };

        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);

        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, (dep_idx, edge)) in dependents.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(&mut output, dep_idx, edge.kind, "", is_last, &mut visited);
        }

        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        kind: DepKind,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node} ({kind})\n"));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, (dep_idx, edge)) in dependents.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(output, dep_idx, edge.kind, &child_prefix, is_last, visited);
        }

        visited.remove(&idx);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
