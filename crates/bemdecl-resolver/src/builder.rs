//! Breadth-first graph expansion through a dependency provider.

use std::collections::{HashMap, HashSet};

use bemdecl_core::entity::EntityRef;
use bemdecl_core::{BemEntity, Declaration};
use petgraph::graph::NodeIndex;

use crate::graph::{DepKind, DependencyGraph};
use crate::provider::{DependencyProvider, DependencyRecord};
use crate::resolver::ResolveError;

/// Expand `decl` into a dependency graph.
///
/// Every round sends one batched `fetch` for the entities discovered in the
/// previous round, so an entity is queried at most once no matter how many
/// edges lead to it. Records are applied in frontier order, and within one
/// entity in the order the provider returned them.
pub async fn build_graph<P>(
    decl: &Declaration,
    provider: &P,
    tech: Option<&str>,
) -> Result<DependencyGraph, ResolveError>
where
    P: DependencyProvider + ?Sized,
{
    let mut graph = DependencyGraph::new();
    let mut frontier: Vec<NodeIndex> = decl.entities().map(|e| graph.add_root(e.clone())).collect();
    let mut round = 0;

    while !frontier.is_empty() {
        let entities: Vec<BemEntity> = frontier.iter().map(|&idx| graph.entity(idx).clone()).collect();
        tracing::debug!("round {round}: fetching {} entities", entities.len());
        let records = provider.fetch(&entities).await?;

        let requested: HashSet<&BemEntity> = entities.iter().collect();
        let mut by_entity: HashMap<&BemEntity, Vec<&DependencyRecord>> = HashMap::new();
        for record in &records {
            if !requested.contains(&record.entity) {
                tracing::warn!("ignoring record for `{}` which was not requested", record.entity);
                continue;
            }
            if !record.applies_to(tech) {
                tracing::debug!(
                    "skipping {} record of {} (resolving for {})",
                    record.tech.as_deref().unwrap_or_default(),
                    record.entity,
                    tech.unwrap_or("no tech")
                );
                continue;
            }
            by_entity.entry(&record.entity).or_default().push(record);
        }

        let mut next = Vec::new();
        for &idx in &frontier {
            let Some(entity_records) = by_entity.get(graph.entity(idx)) else {
                continue;
            };
            for record in entity_records {
                add_edges(&mut graph, idx, &record.must, DepKind::Must, round, &mut next)?;
                add_edges(&mut graph, idx, &record.should, DepKind::Should, round, &mut next)?;
            }
        }

        tracing::debug!(
            "round {round}: {} new entities, {} nodes in total",
            next.len(),
            graph.len()
        );
        frontier = next;
        round += 1;
    }

    Ok(graph)
}

fn add_edges(
    graph: &mut DependencyGraph,
    from: NodeIndex,
    refs: &[EntityRef],
    kind: DepKind,
    round: usize,
    discovered: &mut Vec<NodeIndex>,
) -> Result<(), ResolveError> {
    for dep in refs {
        let entity = dep.to_entity()?;
        let (to, is_new) = graph.add_node(entity, round + 1);
        if is_new {
            discovered.push(to);
        }
        graph.add_edge(from, to, kind, round);
    }
    Ok(())
}
