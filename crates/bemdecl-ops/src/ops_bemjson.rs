//! Operation: collect the declaration of a BEMJSON template.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::bemjson;
use bemdecl_core::config::OutputConfig;
use bemdecl_util::errors::BemError;

use crate::bundle::{default_target, Bundle};
use crate::tech::{BuildOutput, Tech};

/// Options for `bemdecl bemjson`.
#[derive(Debug, Clone)]
pub struct BemjsonOptions {
    pub source: String,
    pub target: Option<String>,
    pub output: OutputConfig,
}

impl Default for BemjsonOptions {
    fn default() -> Self {
        Self {
            source: "?.bemjson.json".to_string(),
            target: None,
            output: OutputConfig::default(),
        }
    }
}

pub struct BemjsonTech {
    bundle: Bundle,
    source: PathBuf,
    target: PathBuf,
    output: OutputConfig,
}

#[async_trait]
impl Tech for BemjsonTech {
    type Options = BemjsonOptions;

    fn configure(bundle: &Bundle, options: BemjsonOptions) -> miette::Result<Self> {
        let target = options
            .target
            .as_deref()
            .unwrap_or(default_target(options.output.format));
        Ok(Self {
            bundle: bundle.clone(),
            source: bundle.resolve(&options.source),
            target: bundle.resolve(target),
            output: options.output,
        })
    }

    fn name(&self) -> &'static str {
        "bemjson-to-bemdecl"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.target.clone()]
    }

    async fn build(&self) -> miette::Result<BuildOutput> {
        let text = std::fs::read_to_string(&self.source).map_err(|e| BemError::Declaration {
            message: format!("failed to read {}: {e}", self.source.display()),
        })?;
        let tree: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| BemError::Declaration {
                message: format!("{}: invalid BEMJSON: {e}", self.source.display()),
            })?;
        let decl = bemjson::to_declaration(&tree)?;
        self.bundle.write_declaration(&self.target, &decl, &self.output)?;
        tracing::info!(
            "collected {} entities from {}",
            decl.len(),
            self.source.display()
        );
        Ok(BuildOutput::new(self.target.clone(), decl))
    }
}

/// Configure and run a BEMJSON conversion.
pub async fn bemjson(bundle: &Bundle, options: BemjsonOptions) -> miette::Result<BuildOutput> {
    BemjsonTech::configure(bundle, options)?.build().await
}
