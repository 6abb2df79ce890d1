//! The capability every declaration build step implements.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::Declaration;
use bemdecl_resolver::diagnostics::RollbackReport;

use crate::bundle::Bundle;

/// A build step that turns source declarations of a bundle into one target.
///
/// `configure` validates options and resolves target masks; `build` does
/// the work and may be called any number of times.
#[async_trait]
pub trait Tech: Sized + Send + Sync {
    type Options: Send;

    fn configure(bundle: &Bundle, options: Self::Options) -> miette::Result<Self>;

    fn name(&self) -> &'static str;

    /// Files this tech writes.
    fn targets(&self) -> Vec<PathBuf>;

    async fn build(&self) -> miette::Result<BuildOutput>;
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub target: PathBuf,
    pub declaration: Declaration,
    /// Only resolution fills this in.
    pub rollback: RollbackReport,
}

impl BuildOutput {
    pub fn new(target: PathBuf, declaration: Declaration) -> Self {
        Self {
            target,
            declaration,
            rollback: RollbackReport::new(),
        }
    }
}

/// Resolve required source masks against the bundle.
pub(crate) fn required_sources(
    bundle: &Bundle,
    tech: &str,
    masks: &[String],
) -> miette::Result<Vec<PathBuf>> {
    if masks.is_empty() {
        return Err(bemdecl_util::errors::BemError::Config {
            message: format!("{tech}: option `sources` needs at least one file"),
        }
        .into());
    }
    Ok(masks.iter().map(|mask| bundle.resolve(mask)).collect())
}
