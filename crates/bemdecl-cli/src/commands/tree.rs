//! Handler for `bemdecl tree`.

use miette::Result;

use bemdecl_ops::ops_deps::DepsOptions;
use bemdecl_ops::ops_tree::{self, TreeOptions};

use super::Context;
use crate::cli::ResolveArgs;

pub async fn exec(
    ctx: &Context,
    resolve: &ResolveArgs,
    depth: Option<usize>,
    why: Option<String>,
    invert: Option<String>,
    rollbacks: bool,
) -> Result<()> {
    let opts = TreeOptions {
        deps: DepsOptions {
            source: resolve.source.clone(),
            records: resolve.records.clone(),
            resolver: ctx.resolver(resolve),
            ..Default::default()
        },
        depth,
        why,
        invert,
        rollbacks,
    };

    let output = ops_tree::tree(&ctx.bundle, &opts).await?;
    print!("{output}");
    Ok(())
}
