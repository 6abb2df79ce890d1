use std::collections::HashSet;

use bemdecl_core::{BemEntity, Declaration};
use bemdecl_resolver::diagnostics::check_order;
use bemdecl_resolver::{resolve, DependencyRecord, ResolveError, ResolveOptions, StaticProvider};
use proptest::prelude::*;

/// Per node: `must` targets and `should` targets, by node number.
type Adjacency = Vec<(Vec<usize>, Vec<usize>)>;

fn node(i: usize) -> BemEntity {
    BemEntity::block(&format!("n{i}")).unwrap()
}

fn provider_for(adjacency: &Adjacency) -> StaticProvider {
    StaticProvider::from_records(adjacency.iter().enumerate().map(|(i, (must, should))| {
        let mut record = DependencyRecord::new(node(i));
        for &m in must {
            record = record.must(&node(m));
        }
        for &s in should {
            record = record.should(&node(s));
        }
        record
    }))
}

fn reachable(adjacency: &Adjacency, roots: usize) -> HashSet<usize> {
    let mut seen: HashSet<usize> = (0..roots).collect();
    let mut stack: Vec<usize> = (0..roots).collect();
    while let Some(n) = stack.pop() {
        let (must, should) = &adjacency[n];
        for &next in must.iter().chain(should) {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}

/// Whether a `must` cycle exists among the reachable nodes.
fn has_must_cycle(adjacency: &Adjacency, nodes: &HashSet<usize>) -> bool {
    // 0 = unvisited, 1 = on the current path, 2 = done
    fn visit(n: usize, adjacency: &Adjacency, color: &mut [u8]) -> bool {
        color[n] = 1;
        for &m in &adjacency[n].0 {
            if color[m] == 1 || (color[m] == 0 && visit(m, adjacency, color)) {
                return true;
            }
        }
        color[n] = 2;
        false
    }

    let mut color = vec![0u8; adjacency.len()];
    let mut sorted: Vec<usize> = nodes.iter().copied().collect();
    sorted.sort();
    sorted
        .into_iter()
        .any(|n| color[n] == 0 && visit(n, adjacency, &mut color))
}

fn graphs(forward_only: bool) -> impl Strategy<Value = (Adjacency, usize)> {
    (1usize..9).prop_flat_map(move |n| {
        let deps = prop::collection::vec(0..n, 0..4);
        (
            prop::collection::vec((deps.clone(), deps), n).prop_map(move |adjacency| {
                if !forward_only {
                    return adjacency;
                }
                adjacency
                    .into_iter()
                    .enumerate()
                    .map(|(i, (must, should))| (must.into_iter().filter(|&m| m > i).collect(), should))
                    .collect()
            }),
            1..=n,
        )
    })
}

fn run(adjacency: &Adjacency, roots: usize) -> Result<bemdecl_resolver::ResolutionResult, ResolveError> {
    let decl = Declaration::from_entries((0..roots).map(node));
    let provider = provider_for(adjacency);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(resolve(&decl, &provider, &ResolveOptions::default()))
}

proptest! {
    #[test]
    fn resolves_or_reports_a_real_cycle((adjacency, roots) in graphs(false)) {
        let reach = reachable(&adjacency, roots);
        match run(&adjacency, roots) {
            Ok(result) => {
                prop_assert!(check_order(&result.graph, &result.order).is_ok());
                prop_assert_eq!(result.order.len(), reach.len());
                let expected: HashSet<BemEntity> = reach.iter().map(|&i| node(i)).collect();
                let got: HashSet<BemEntity> = result.order.iter().cloned().collect();
                prop_assert_eq!(got, expected);
                prop_assert!(!has_must_cycle(&adjacency, &reach));
            }
            Err(ResolveError::Cycle(cycle)) => {
                prop_assert!(!cycle.entities.is_empty());
                prop_assert!(has_must_cycle(&adjacency, &reach));
                for entity in &cycle.entities {
                    let i: usize = entity.block_name()[1..].parse().unwrap();
                    prop_assert!(reach.contains(&i));
                }
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn acyclic_graphs_always_resolve((adjacency, roots) in graphs(true)) {
        let result = run(&adjacency, roots);
        prop_assert!(result.is_ok());
        let result = result.unwrap();
        prop_assert!(check_order(&result.graph, &result.order).is_ok());
    }

    #[test]
    fn resolution_is_repeatable((adjacency, roots) in graphs(false)) {
        let first = run(&adjacency, roots).map(|r| r.order).map_err(|e| e.to_string());
        let second = run(&adjacency, roots).map(|r| r.order).map_err(|e| e.to_string());
        prop_assert_eq!(first, second);
    }
}
