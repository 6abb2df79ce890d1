//! Bundle directories and target names.

use std::path::{Path, PathBuf};

use bemdecl_core::codec::{self, DeclFormat};
use bemdecl_core::config::OutputConfig;
use bemdecl_core::Declaration;
use bemdecl_util::errors::BemError;

/// A directory holding the declaration files of one page or bundle.
///
/// Target masks may contain `?`, which expands to the bundle name:
/// `?.deps.json` in bundle `index` is `index.deps.json`.
#[derive(Debug, Clone)]
pub struct Bundle {
    dir: PathBuf,
    name: String,
}

impl Bundle {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// A bundle named after its directory. The path is canonicalized.
    pub fn from_dir(dir: &Path) -> miette::Result<Self> {
        let dir = dir.canonicalize().map_err(BemError::Io)?;
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| BemError::Config {
                message: format!("cannot derive a bundle name from {}", dir.display()),
            })?;
        Ok(Self::new(dir, name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace every `?` in `mask` with the bundle name.
    pub fn unmask(&self, mask: &str) -> String {
        mask.replace('?', &self.name)
    }

    /// Absolute path of a target mask inside the bundle.
    pub fn resolve(&self, mask: &str) -> PathBuf {
        self.dir.join(self.unmask(mask))
    }

    /// Read and decode a declaration file.
    pub fn read_declaration(&self, path: &Path) -> miette::Result<Declaration> {
        let text = std::fs::read_to_string(path).map_err(|e| BemError::Declaration {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let decl = codec::parse_declaration(&text).map_err(|e| BemError::Declaration {
            message: format!("{}: {e}", path.display()),
        })?;
        tracing::debug!("read {} entities from {}", decl.len(), path.display());
        Ok(decl)
    }

    /// Encode `decl` and write it to `path` atomically.
    pub fn write_declaration(
        &self,
        path: &Path,
        decl: &Declaration,
        output: &OutputConfig,
    ) -> miette::Result<()> {
        let mut text = codec::to_json(decl, output.format, output.pretty).map_err(|e| {
            BemError::Declaration {
                message: format!("{}: {e}", path.display()),
            }
        })?;
        text.push('\n');
        bemdecl_util::fs::write_atomic(path, &text).map_err(BemError::Io)?;
        tracing::debug!("wrote {} entities to {}", decl.len(), path.display());
        Ok(())
    }
}

/// Default target mask for a declaration in the given format.
pub fn default_target(format: DeclFormat) -> &'static str {
    match format {
        DeclFormat::Bemdecl => "?.bemdecl.json",
        DeclFormat::Deps => "?.deps.json",
    }
}
