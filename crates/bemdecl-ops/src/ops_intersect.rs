//! Operation: intersect declarations.

use std::path::PathBuf;

use async_trait::async_trait;
use bemdecl_core::algebra;
use bemdecl_core::config::OutputConfig;

use crate::bundle::{default_target, Bundle};
use crate::tech::{required_sources, BuildOutput, Tech};

/// Options for `bemdecl intersect`.
#[derive(Debug, Clone, Default)]
pub struct IntersectOptions {
    /// Source masks; the result keeps the order of the first one.
    pub sources: Vec<String>,
    /// Target mask; depends on the output format when unset.
    pub target: Option<String>,
    pub output: OutputConfig,
}

/// Keeps the entities common to every source.
pub struct IntersectTech {
    bundle: Bundle,
    sources: Vec<PathBuf>,
    target: PathBuf,
    output: OutputConfig,
}

#[async_trait]
impl Tech for IntersectTech {
    type Options = IntersectOptions;

    fn configure(bundle: &Bundle, options: IntersectOptions) -> miette::Result<Self> {
        let sources = required_sources(bundle, "intersect", &options.sources)?;
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
        "intersect"
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
        let common = algebra::intersect(&decls);
        self.bundle.write_declaration(&self.target, &common, &self.output)?;
        tracing::info!(
            "intersected {} declarations into {} ({} entities)",
            decls.len(),
            self.target.display(),
            common.len()
        );
        Ok(BuildOutput::new(self.target.clone(), common))
    }
}

/// Configure and run an intersection.
pub async fn intersect(bundle: &Bundle, options: IntersectOptions) -> miette::Result<BuildOutput> {
    IntersectTech::configure(bundle, options)?.build().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_common_entities() {
        let tmp = tempfile::tempdir().unwrap();
        let bundle = Bundle::new(tmp.path(), "common");
        std::fs::write(
            tmp.path().join("a.bemdecl.json"),
            r#"{"blocks": [{"name": "b1"}, {"name": "b2"}]}"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("b.bemdecl.json"),
            r#"{"blocks": [{"name": "b2"}, {"name": "b3"}]}"#,
        )
        .unwrap();

        let options = IntersectOptions {
            sources: vec!["a.bemdecl.json".to_string(), "b.bemdecl.json".to_string()],
            ..Default::default()
        };
        let out = intersect(&bundle, options).await.unwrap();
        assert_eq!(out.target, tmp.path().join("common.bemdecl.json"));
        assert_eq!(out.declaration.len(), 1);

        let written = bundle.read_declaration(&out.target).unwrap();
        assert_eq!(written, out.declaration);
    }
}
