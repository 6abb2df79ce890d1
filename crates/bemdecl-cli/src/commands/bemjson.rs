//! Handler for `bemdecl bemjson`.

use miette::Result;

use bemdecl_ops::ops_bemjson::{self, BemjsonOptions};

use super::{report, Context};
use crate::cli::OutputArgs;

pub async fn exec(ctx: &Context, source: String, output: &OutputArgs) -> Result<()> {
    let opts = BemjsonOptions {
        source,
        target: output.target.clone(),
        output: ctx.output(output),
    };
    let out = ops_bemjson::bemjson(&ctx.bundle, opts).await?;
    report(&out);
    Ok(())
}
