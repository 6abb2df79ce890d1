//! Rollback reporting and order checking.

use std::collections::HashMap;
use std::fmt;

use bemdecl_core::BemEntity;

use crate::graph::{DepKind, DependencyGraph};

/// A report of every rollback performed while linearizing.
#[derive(Debug, Default, Clone)]
pub struct RollbackReport {
    pub events: Vec<RollbackEvent>,
}

/// One repair of a violated `must` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackEvent {
    /// The dependent that was placed too early.
    pub entity: BemEntity,
    /// The dependency it was missing.
    pub missing: BemEntity,
    /// How many placed entities were retracted, `entity` included.
    pub retracted: usize,
}

impl RollbackReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: RollbackEvent) {
        self.events.push(event);
    }

    /// Whether at least one rollback happened.
    pub fn happened(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for RollbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() {
            return write!(f, "No rollbacks.");
        }
        writeln!(f, "Rollbacks ({}):", self.events.len())?;
        for event in &self.events {
            writeln!(f, "  {event}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RollbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} was placed before {}, retracted {} entities",
            self.entity, self.missing, self.retracted
        )
    }
}

/// The first problem found by [`check_order`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum OrderViolation {
    #[error("`{0}` appears more than once")]
    #[diagnostic(code(bemdecl::order::duplicate))]
    Duplicate(BemEntity),

    #[error("`{dependency}` is required by `{dependent}` ({kind}) but missing")]
    #[diagnostic(code(bemdecl::order::missing))]
    Missing {
        dependent: BemEntity,
        dependency: BemEntity,
        kind: DepKind,
    },

    #[error("`{dependent}` must come after `{dependency}`")]
    #[diagnostic(code(bemdecl::order::must))]
    MustOrder {
        dependent: BemEntity,
        dependency: BemEntity,
    },
}

/// Check `order` against every edge of `graph`.
///
/// Only entities that appear in `order` are checked as dependents, so a
/// partial order (such as an algebra result) can be validated as well.
pub fn check_order(graph: &DependencyGraph, order: &[BemEntity]) -> Result<(), OrderViolation> {
    let mut position: HashMap<&BemEntity, usize> = HashMap::with_capacity(order.len());
    for (i, entity) in order.iter().enumerate() {
        if position.insert(entity, i).is_some() {
            return Err(OrderViolation::Duplicate(entity.clone()));
        }
    }

    for (i, entity) in order.iter().enumerate() {
        let Some(idx) = graph.find(entity) else {
            continue;
        };
        for (dep_idx, edge) in graph.dependencies_of(idx) {
            let dependency = graph.entity(dep_idx);
            match (position.get(dependency), edge.kind) {
                (None, kind) => {
                    return Err(OrderViolation::Missing {
                        dependent: entity.clone(),
                        dependency: dependency.clone(),
                        kind,
                    })
                }
                (Some(&dep_pos), DepKind::Must) if dep_pos >= i => {
                    return Err(OrderViolation::MustOrder {
                        dependent: entity.clone(),
                        dependency: dependency.clone(),
                    })
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(s: &str) -> BemEntity {
        BemEntity::parse(s).unwrap()
    }

    #[test]
    fn empty_report() {
        let report = RollbackReport::new();
        assert!(!report.happened());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No rollbacks.");
    }

    #[test]
    fn report_with_events() {
        let mut report = RollbackReport::new();
        report.add(RollbackEvent {
            entity: e("b"),
            missing: e("c"),
            retracted: 2,
        });
        assert!(report.happened());
        let s = report.to_string();
        assert!(s.contains("Rollbacks (1):"));
        assert!(s.contains("b was placed before c, retracted 2 entities"));
    }

    #[test]
    fn check_finds_violations() {
        let mut g = DependencyGraph::new();
        let a = g.add_root(e("a"));
        let (b, _) = g.add_node(e("b"), 1);
        let (c, _) = g.add_node(e("c"), 1);
        g.add_edge(a, b, DepKind::Must, 0);
        g.add_edge(a, c, DepKind::Should, 0);

        assert!(check_order(&g, &[e("b"), e("a"), e("c")]).is_ok());
        assert!(check_order(&g, &[e("c"), e("b"), e("a")]).is_ok());
        assert_eq!(
            check_order(&g, &[e("a"), e("b"), e("c")]),
            Err(OrderViolation::MustOrder {
                dependent: e("a"),
                dependency: e("b")
            })
        );
        assert_eq!(
            check_order(&g, &[e("b"), e("a")]),
            Err(OrderViolation::Missing {
                dependent: e("a"),
                dependency: e("c"),
                kind: DepKind::Should
            })
        );
        assert_eq!(
            check_order(&g, &[e("b"), e("b")]),
            Err(OrderViolation::Duplicate(e("b")))
        );
    }
}
