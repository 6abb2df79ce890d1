//! Command dispatch and handler modules.

mod bemjson;
mod deps;
mod entity;
mod intersect;
mod merge;
mod subtract;
mod tree;

use std::path::Path;

use bemdecl_core::config::{Config, OutputConfig, ResolverConfig};
use bemdecl_ops::bundle::Bundle;
use bemdecl_ops::tech::BuildOutput;
use miette::Result;

use crate::cli::{Cli, Command, OutputArgs, ResolveArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    if let Command::Entity { notations } = &cli.command {
        return entity::exec(notations);
    }

    let ctx = Context::load(&cli.bundle, cli.config.as_deref())?;
    match cli.command {
        Command::Merge { sources, output } => merge::exec(&ctx, sources, &output).await,
        Command::Intersect { sources, output } => intersect::exec(&ctx, sources, &output).await,
        Command::Subtract { from, what, output } => subtract::exec(&ctx, from, what, &output).await,
        Command::Deps {
            resolve,
            target,
            check,
            compact,
        } => deps::exec(&ctx, &resolve, target, check, compact).await,
        Command::Bemjson { source, output } => bemjson::exec(&ctx, source, &output).await,
        Command::Tree {
            resolve,
            depth,
            why,
            invert,
            rollbacks,
        } => tree::exec(&ctx, &resolve, depth, why, invert, rollbacks).await,
        Command::Entity { notations } => entity::exec(&notations),
    }
}

/// The bundle being worked on and its configuration.
pub(crate) struct Context {
    pub bundle: Bundle,
    pub config: Config,
}

impl Context {
    fn load(bundle_dir: &Path, config: Option<&Path>) -> Result<Self> {
        let bundle = Bundle::from_dir(bundle_dir)?;
        let (config, path) = Config::discover(bundle.dir(), config)?;
        if let Some(path) = path {
            tracing::debug!("loaded {}", path.display());
        }
        Ok(Self { bundle, config })
    }

    /// Output settings with command-line flags applied over the config file.
    pub fn output(&self, args: &OutputArgs) -> OutputConfig {
        OutputConfig {
            format: args.format.unwrap_or(self.config.output.format),
            pretty: self.config.output.pretty && !args.compact,
        }
    }

    /// Resolver settings with command-line flags applied over the config file.
    pub fn resolver(&self, args: &ResolveArgs) -> ResolverConfig {
        let file = &self.config.resolver;
        ResolverConfig {
            tech: args.tech.clone().or_else(|| file.tech.clone()),
            retraction_limit: args.retraction_limit.or(file.retraction_limit),
            fail_on_rollback: args.fail_on_rollback || file.fail_on_rollback,
        }
    }
}

fn report(output: &BuildOutput) {
    println!(
        "Wrote {} ({} entities)",
        output.target.display(),
        output.declaration.len()
    );
}
