//! Operation: subtract one declaration from another.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::algebra;
use bemdecl_core::config::OutputConfig;

use crate::bundle::{default_target, Bundle};
use crate::tech::{BuildOutput, Tech};

/// Options for `bemdecl subtract`.
#[derive(Debug, Clone, Default)]
pub struct SubtractOptions {
    /// Mask of the declaration to subtract from.
    pub from: String,
    /// Mask of the declaration whose entities are removed.
    pub what: String,
    pub target: Option<String>,
    pub output: OutputConfig,
}

pub struct SubtractTech {
    bundle: Bundle,
    from: PathBuf,
    what: PathBuf,
    target: PathBuf,
    output: OutputConfig,
}

#[async_trait]
impl Tech for SubtractTech {
    type Options = SubtractOptions;

    fn configure(bundle: &Bundle, options: SubtractOptions) -> miette::Result<Self> {
        for (option, value) in [("from", &options.from), ("what", &options.what)] {
            if value.is_empty() {
                return Err(bemdecl_util::errors::BemError::Config {
                    message: format!("subtract: option `{option}` is required"),
                }
                .into());
            }
        }
        let target = options
            .target
            .as_deref()
            .unwrap_or(default_target(options.output.format));
        Ok(Self {
            bundle: bundle.clone(),
            from: bundle.resolve(&options.from),
            what: bundle.resolve(&options.what),
            target: bundle.resolve(target),
            output: options.output,
        })
    }

    fn name(&self) -> &'static str {
        "subtract"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.target.clone()]
    }

    async fn build(&self) -> miette::Result<BuildOutput> {
        let from = self.bundle.read_declaration(&self.from)?;
        let what = self.bundle.read_declaration(&self.what)?;
        let rest = algebra::subtract(&from, &what);
        self.bundle.write_declaration(&self.target, &rest, &self.output)?;
        tracing::info!(
            "subtracted {} from {}: {} of {} entities left",
            self.what.display(),
            self.from.display(),
            rest.len(),
            from.len()
        );
        Ok(BuildOutput::new(self.target.clone(), rest))
    }
}

/// Configure and run a subtraction.
pub async fn subtract(bundle: &Bundle, options: SubtractOptions) -> miette::Result<BuildOutput> {
    SubtractTech::configure(bundle, options)?.build().await
}
