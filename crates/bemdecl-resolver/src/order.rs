//! Linearization of a dependency graph with rollback.
//!
//! The graph is replayed in the rounds it was built in. At step `s` every
//! edge reported in a round `<= s` is visible. Nodes are placed in discovery
//! order by a depth-first walk over visible `must` edges, so dependencies land
//! before their dependents. When a later round reveals a `must` edge that the
//! current placement violates, the dependent and everything placed after it
//! that depends on it are retracted, the missing dependency is placed, and the
//! unplaced nodes are placed again in their previous relative order.

use petgraph::graph::NodeIndex;

use crate::diagnostics::{RollbackEvent, RollbackReport};
use crate::graph::{DepKind, DependencyGraph};
use crate::resolver::CycleError;

/// A linear order over every node of a graph.
#[derive(Debug)]
pub struct Linearization {
    pub order: Vec<NodeIndex>,
    pub rollback: RollbackReport,
}

/// Linearize `graph`. Each node may be retracted at most `retraction_limit`
/// times (the node count when `None`) before the graph is declared cyclic.
pub fn linearize(
    graph: &DependencyGraph,
    retraction_limit: Option<usize>,
) -> Result<Linearization, CycleError> {
    let mut resolver = OrderResolver::new(graph, retraction_limit);
    resolver.run()?;
    Ok(Linearization {
        order: resolver.order,
        rollback: resolver.report,
    })
}

struct OrderResolver<'g> {
    graph: &'g DependencyGraph,
    /// `must` dependencies per node, in provider order, with the round in
    /// which each edge became known.
    must: Vec<Vec<(NodeIndex, usize)>>,
    step: usize,
    order: Vec<NodeIndex>,
    position: Vec<Option<usize>>,
    on_stack: Vec<bool>,
    retractions: Vec<usize>,
    limit: usize,
    report: RollbackReport,
}

impl<'g> OrderResolver<'g> {
    fn new(graph: &'g DependencyGraph, retraction_limit: Option<usize>) -> Self {
        let n = graph.len();
        let must = graph
            .node_indices()
            .map(|idx| {
                graph
                    .dependencies_of(idx)
                    .into_iter()
                    .filter(|(_, edge)| edge.kind == DepKind::Must)
                    .map(|(dep, edge)| (dep, edge.round))
                    .collect()
            })
            .collect();
        Self {
            graph,
            must,
            step: 0,
            order: Vec::with_capacity(n),
            position: vec![None; n],
            on_stack: vec![false; n],
            retractions: vec![0; n],
            limit: retraction_limit.unwrap_or(n).max(1),
            report: RollbackReport::new(),
        }
    }

    fn run(&mut self) -> Result<(), CycleError> {
        if self.graph.is_empty() {
            return Ok(());
        }
        let graph = self.graph;
        let max_round = graph.max_round();
        let mut by_round: Vec<Vec<NodeIndex>> = vec![Vec::new(); max_round + 1];
        for node in graph.node_indices() {
            by_round[graph.node(node).round].push(node);
        }

        // Every node of rounds below `next_round` has been placed.
        let mut next_round = 0;
        for step in 0..=max_round {
            self.step = step;

            for &node in &by_round[step] {
                while let Some(dep) = self.first_violation(node) {
                    self.repair(node, dep)?;
                }
            }

            let through = (step + 1).min(max_round);
            for round in next_round..=through {
                for &node in &by_round[round] {
                    self.place(node)?;
                }
            }
            next_round = through + 1;
        }
        tracing::debug!(
            "linearized {} entities with {} rollbacks",
            self.order.len(),
            self.report.len()
        );
        Ok(())
    }

    fn visible_must(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let step = self.step;
        self.must[node.index()]
            .iter()
            .filter(move |(_, round)| *round <= step)
            .map(|(dep, _)| *dep)
    }

    /// The first visible `must` dependency of a placed node that is missing
    /// or not placed strictly before it.
    fn first_violation(&self, node: NodeIndex) -> Option<NodeIndex> {
        let pos = self.position[node.index()]?;
        self.visible_must(node)
            .find(|dep| self.position[dep.index()].map_or(true, |dep_pos| dep_pos >= pos))
    }

    fn append(&mut self, node: NodeIndex) {
        self.position[node.index()] = Some(self.order.len());
        self.order.push(node);
    }

    /// Place `root` after all of its visible `must` dependencies.
    fn place(&mut self, root: NodeIndex) -> Result<(), CycleError> {
        if self.position[root.index()].is_some() {
            return Ok(());
        }
        let mut stack: Vec<(NodeIndex, usize)> = vec![(root, 0)];
        self.on_stack[root.index()] = true;

        while let Some(&(node, mut cursor)) = stack.last() {
            let deps = &self.must[node.index()];
            let mut next = None;
            while cursor < deps.len() {
                let (dep, round) = deps[cursor];
                cursor += 1;
                if round > self.step || self.position[dep.index()].is_some() {
                    continue;
                }
                if self.on_stack[dep.index()] {
                    return Err(self.cycle_error(dep));
                }
                next = Some(dep);
                break;
            }

            if let Some(top) = stack.last_mut() {
                top.1 = cursor;
            }
            match next {
                Some(dep) => {
                    self.on_stack[dep.index()] = true;
                    stack.push((dep, 0));
                }
                None => {
                    stack.pop();
                    self.on_stack[node.index()] = false;
                    self.append(node);
                }
            }
        }
        Ok(())
    }

    /// Repair the violated edge `node -> dep`.
    ///
    /// Everything from `node` onwards is unplaced. Nodes that transitively
    /// `must`-depend on `node` count as retracted; the rest only move. `dep`
    /// is placed first, then the old suffix in its previous order.
    fn repair(&mut self, node: NodeIndex, dep: NodeIndex) -> Result<(), CycleError> {
        let Some(start) = self.position[node.index()] else {
            return self.place(node);
        };

        let mut tainted = vec![false; self.graph.len()];
        tainted[node.index()] = true;
        let suffix: Vec<NodeIndex> = self.order.drain(start..).collect();
        let mut retracted = 0;
        for &n in &suffix {
            self.position[n.index()] = None;
            if n != node && !self.visible_must(n).any(|d| tainted[d.index()]) {
                continue;
            }
            tainted[n.index()] = true;
            retracted += 1;
            self.retractions[n.index()] += 1;
            if self.retractions[n.index()] > self.limit {
                tracing::debug!(
                    "{} retracted more than {} times",
                    self.graph.entity(n),
                    self.limit
                );
                return Err(self.cycle_error(n));
            }
        }

        tracing::debug!(
            "rollback at step {}: {} needs {} first, retracting {} entities",
            self.step,
            self.graph.entity(node),
            self.graph.entity(dep),
            retracted
        );
        self.report.add(RollbackEvent {
            entity: self.graph.entity(node).clone(),
            missing: self.graph.entity(dep).clone(),
            retracted,
        });

        self.place(dep)?;
        for n in suffix {
            self.place(n)?;
        }
        Ok(())
    }

    fn cycle_error(&self, node: NodeIndex) -> CycleError {
        let mut members = self.graph.must_cycle_through(node);
        if members.is_empty() {
            members.push(node);
        }
        CycleError {
            entities: members
                .into_iter()
                .map(|idx| self.graph.entity(idx).clone())
                .collect(),
        }
    }
}
