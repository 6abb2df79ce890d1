//! Operation: display the resolved dependency tree.

use bemdecl_core::BemEntity;

use crate::bundle::Bundle;
use crate::ops_deps::{DepsOptions, DepsTech};
use crate::tech::Tech;

/// Options for `bemdecl tree`.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// How the graph is resolved.
    pub deps: DepsOptions,
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show one path from a declared entity to this entity.
    pub why: Option<String>,
    /// Show what depends on this entity.
    pub invert: Option<String>,
    /// Show the rollback report instead of the tree.
    pub rollbacks: bool,
}

/// Render the dependency tree of a bundle.
pub async fn tree(bundle: &Bundle, opts: &TreeOptions) -> miette::Result<String> {
    let tech = DepsTech::configure(bundle, opts.deps.clone())?;
    let result = tech.resolve().await?;

    if let Some(ref target) = opts.why {
        let entity: BemEntity = target.parse()?;
        let mut out = String::new();
        if let Some(path) = result.graph.find_path(&entity) {
            out.push_str(&format!("Path to {entity}:\n"));
            for (i, node) in path.iter().enumerate() {
                let indent = "  ".repeat(i);
                out.push_str(&format!("{indent}{node}\n"));
            }
        } else {
            out.push_str(&format!("Entity '{entity}' not found in the graph.\n"));
        }
        return Ok(out);
    }

    if let Some(ref target) = opts.invert {
        let entity: BemEntity = target.parse()?;
        let inverted = result.graph.print_inverted_tree(&entity);
        if inverted.is_empty() {
            return Ok(format!("Entity '{entity}' not found in the graph.\n"));
        }
        return Ok(inverted);
    }

    if opts.rollbacks {
        let mut report = result.rollback.to_string();
        if !report.ends_with('\n') {
            report.push('\n');
        }
        return Ok(report);
    }

    Ok(result.graph.print_tree(opts.depth))
}
