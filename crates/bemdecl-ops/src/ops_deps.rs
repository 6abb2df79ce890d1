//! Operation: resolve the dependencies of a declaration.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::codec::DeclFormat;
use bemdecl_core::config::{OutputConfig, ResolverConfig};
use bemdecl_resolver::diagnostics::check_order;
use bemdecl_resolver::{resolve, ResolutionResult, ResolveOptions, StaticProvider};
use bemdecl_util::errors::BemError;

use crate::bundle::Bundle;
use crate::tech::{BuildOutput, Tech};

/// Options for `bemdecl deps`.
#[derive(Debug, Clone)]
pub struct DepsOptions {
    /// Mask of the declaration to resolve.
    pub source: String,
    /// Mask of the dependency records file.
    pub records: String,
    pub target: String,
    pub resolver: ResolverConfig,
    pub pretty: bool,
    /// Verify the resolved order against the graph before writing it.
    pub check: bool,
}

impl Default for DepsOptions {
    fn default() -> Self {
        Self {
            source: "?.bemdecl.json".to_string(),
            records: "?.records.json".to_string(),
            target: "?.deps.json".to_string(),
            resolver: ResolverConfig::default(),
            pretty: true,
            check: false,
        }
    }
}

/// Resolves a declaration into an ordered `deps` file.
pub struct DepsTech {
    bundle: Bundle,
    source: PathBuf,
    records: PathBuf,
    target: PathBuf,
    resolver: ResolverConfig,
    pretty: bool,
    check: bool,
}

impl DepsTech {
    /// Run the resolution without writing anything.
    pub async fn resolve(&self) -> miette::Result<ResolutionResult> {
        let decl = self.bundle.read_declaration(&self.source)?;
        let provider = StaticProvider::from_path(&self.records)?;
        let options = ResolveOptions {
            tech: self.resolver.tech.clone(),
            retraction_limit: self.resolver.retraction_limit,
        };
        let result = resolve(&decl, &provider, &options).await?;

        if result.rollback_happened() {
            if self.resolver.fail_on_rollback {
                return Err(BemError::Resolution {
                    message: format!(
                        "rollback needed while ordering {}\n{}",
                        self.source.display(),
                        result.rollback
                    ),
                }
                .into());
            }
            tracing::warn!(
                "declaration and provider order of {} needed {} rollbacks",
                self.source.display(),
                result.rollback.len()
            );
        }

        if self.check {
            check_order(&result.graph, &result.order).map_err(|v| BemError::Resolution {
                message: format!("resolved order is inconsistent: {v}"),
            })?;
        }
        Ok(result)
    }
}

#[async_trait]
impl Tech for DepsTech {
    type Options = DepsOptions;

    fn configure(bundle: &Bundle, options: DepsOptions) -> miette::Result<Self> {
        if options.resolver.retraction_limit == Some(0) {
            return Err(BemError::Config {
                message: "deps: `retraction-limit` must be at least 1".to_string(),
            }
            .into());
        }
        Ok(Self {
            bundle: bundle.clone(),
            source: bundle.resolve(&options.source),
            records: bundle.resolve(&options.records),
            target: bundle.resolve(&options.target),
            resolver: options.resolver,
            pretty: options.pretty,
            check: options.check,
        })
    }

    fn name(&self) -> &'static str {
        "deps"
    }

    fn targets(&self) -> Vec<PathBuf> {
        vec![self.target.clone()]
    }

    async fn build(&self) -> miette::Result<BuildOutput> {
        let result = self.resolve().await?;
        let decl = result.to_declaration();
        let output = OutputConfig {
            format: DeclFormat::Deps,
            pretty: self.pretty,
        };
        self.bundle.write_declaration(&self.target, &decl, &output)?;
        Ok(BuildOutput {
            target: self.target.clone(),
            declaration: decl,
            rollback: result.rollback,
        })
    }
}

/// Configure and run a resolution.
pub async fn deps(bundle: &Bundle, options: DepsOptions) -> miette::Result<BuildOutput> {
    DepsTech::configure(bundle, options)?.build().await
}
