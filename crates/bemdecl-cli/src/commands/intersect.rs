//! Handler for `bemdecl intersect`.

use miette::Result;

use bemdecl_ops::ops_intersect::{self, IntersectOptions};

use super::{report, Context};
use crate::cli::OutputArgs;

pub async fn exec(ctx: &Context, sources: Vec<String>, output: &OutputArgs) -> Result<()> {
    let opts = IntersectOptions {
        sources,
        target: output.target.clone(),
        output: ctx.output(output),
    };
    let out = ops_intersect::intersect(&ctx.bundle, opts).await?;
    report(&out);
    Ok(())
}
