//! Handler for `bemdecl deps`.

use miette::Result;

use bemdecl_ops::ops_deps::{self, DepsOptions};

use super::{report, Context};
use crate::cli::ResolveArgs;

pub async fn exec(
    ctx: &Context,
    resolve: &ResolveArgs,
    target: String,
    check: bool,
    compact: bool,
) -> Result<()> {
    let opts = DepsOptions {
        source: resolve.source.clone(),
        records: resolve.records.clone(),
        target,
        resolver: ctx.resolver(resolve),
        pretty: ctx.config.output.pretty && !compact,
        check,
    };
    let out = ops_deps::deps(&ctx.bundle, opts).await?;
    report(&out);
    if out.rollback.happened() {
        println!("{} rollbacks were needed; run `bemdecl tree --rollbacks` for details", out.rollback.len());
    }
    Ok(())
}
