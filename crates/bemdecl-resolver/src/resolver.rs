//! Entry point of dependency resolution: expand a declaration through a
//! provider, then linearize the resulting graph.

use std::fmt;

use bemdecl_core::{BemEntity, DeclEntry, Declaration, MalformedEntity};

use crate::builder::build_graph;
use crate::diagnostics::RollbackReport;
use crate::graph::DependencyGraph;
use crate::order::linearize;
use crate::provider::{DependencyProvider, ProviderError};

/// Knobs for one resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Apply only dependency records for this tech (plus untagged ones).
    pub tech: Option<String>,
    /// Per-entity rollback budget; the number of entities when `None`.
    pub retraction_limit: Option<usize>,
}

impl ResolveOptions {
    pub fn for_tech(tech: impl Into<String>) -> Self {
        Self {
            tech: Some(tech.into()),
            ..Self::default()
        }
    }
}

/// An unsatisfiable `must` cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("dependency cycle between {}", EntityList(.entities))]
#[diagnostic(
    code(bemdecl::cycle),
    help("break the cycle by turning one of the `must` dependencies into a `should` dependency")
)]
pub struct CycleError {
    /// Entities on the cycle, in discovery order.
    pub entities: Vec<BemEntity>,
}

struct EntityList<'a>(&'a [BemEntity]);

impl fmt::Display for EntityList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entity) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{entity}`")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Malformed(#[from] MalformedEntity),
}

/// The output of dependency resolution.
#[derive(Debug)]
pub struct ResolutionResult {
    /// Every reachable entity, each once, dependencies first.
    pub order: Vec<BemEntity>,
    pub rollback: RollbackReport,
    pub graph: DependencyGraph,
    /// The declaration that was resolved.
    pub declared: Declaration,
}

impl ResolutionResult {
    /// Whether linearization needed at least one rollback.
    pub fn rollback_happened(&self) -> bool {
        self.rollback.happened()
    }

    /// The resolved order as a declaration. Declared entities keep their
    /// techs; entities pulled in as dependencies apply to every tech.
    pub fn to_declaration(&self) -> Declaration {
        Declaration::from_entries(self.order.iter().map(|entity| {
            self.declared
                .get(entity)
                .cloned()
                .unwrap_or_else(|| DeclEntry::new(entity.clone()))
        }))
    }
}

/// Resolve all dependencies of `decl`.
pub async fn resolve<P>(
    decl: &Declaration,
    provider: &P,
    options: &ResolveOptions,
) -> Result<ResolutionResult, ResolveError>
where
    P: DependencyProvider + ?Sized,
{
    let graph = build_graph(decl, provider, options.tech.as_deref()).await?;
    let linear = linearize(&graph, options.retraction_limit)?;
    let order: Vec<BemEntity> = linear
        .order
        .iter()
        .map(|&idx| graph.entity(idx).clone())
        .collect();

    tracing::info!(
        "resolved {} declared entities into {} entities",
        decl.len(),
        order.len()
    );
    if linear.rollback.happened() {
        tracing::debug!("{}", linear.rollback);
    }

    Ok(ResolutionResult {
        order,
        rollback: linear.rollback,
        graph,
        declared: decl.clone(),
    })
}
