//! Operation: merge declarations.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::algebra;
use bemdecl_core::config::OutputConfig;

use crate::bundle::{default_target, Bundle};
use crate::tech::{required_sources, BuildOutput, Tech};

/// Options for `bemdecl merge`.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Source masks, merged in this order.
    pub sources: Vec<String>,
    /// Target mask; depends on the output format when unset.
    pub target: Option<String>,
    pub output: OutputConfig,
}

/// Merges several declarations into one.
pub struct MergeTech {
    bundle: Bundle,
    sources: Vec<PathBuf>,
    target: PathBuf,
    output: OutputConfig,
}

#[async_trait]
impl Tech for MergeTech {
    type Options = MergeOptions;

    fn configure(bundle: &Bundle, options: MergeOptions) -> miette::Result<Self> {
        let sources = required_sources(bundle, "merge", &options.sources)?;
        let target = options
            .target
            .as_deref()
            .unwrap_or(default_target(options.output.format));
        Ok(Self {
            bundle: bundle.clone(),
            sources,
            target: bundle.resolve(target),
            output: options.output,
        })
    }

    fn name(&self) -> &'static str {
        "merge"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.target.clone()]
    }

    async fn build(&self) -> miette::Result<BuildOutput> {
        let decls = self
            .sources
            .iter()
            .map(|path| self.bundle.read_declaration(path))
            .collect::<miette::Result<Vec<_>>>()?;
        let merged = algebra::merge(&decls);
        self.bundle.write_declaration(&self.target, &merged, &self.output)?;
        tracing::info!(
            "merged {} declarations into {} ({} entities)",
            decls.len(),
            self.target.display(),
            merged.len()
        );
        Ok(BuildOutput::new(self.target.clone(), merged))
    }
}

/// Configure and run a merge.
pub async fn merge(bundle: &Bundle, options: MergeOptions) -> miette::Result<BuildOutput> {
    MergeTech::configure(bundle, options)?.build().await
}
