//! Handler for `bemdecl merge`.

use miette::Result;

use bemdecl_ops::ops_merge::{self, MergeOptions};

use super::{report, Context};
use crate::cli::OutputArgs;

pub async fn exec(ctx: &Context, sources: Vec<String>, output: &OutputArgs) -> Result<()> {
    let opts = MergeOptions {
        sources,
        target: output.target.clone(),
        output: ctx.output(output),
    };
    let out = ops_merge::merge(&ctx.bundle, opts).await?;
    report(&out);
    Ok(())
}
