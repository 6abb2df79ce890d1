//! Handler for `bemdecl subtract`.

use miette::Result;

use bemdecl_ops::ops_subtract::{self, SubtractOptions};

use super::{report, Context};
use crate::cli::OutputArgs;

pub async fn exec(ctx: &Context, from: String, what: String, output: &OutputArgs) -> Result<()> {
    let opts = SubtractOptions {
        from,
        what,
        target: output.target.clone(),
        output: ctx.output(output),
    };
    let out = ops_subtract::subtract(&ctx.bundle, opts).await?;
    report(&out);
    Ok(())
}
