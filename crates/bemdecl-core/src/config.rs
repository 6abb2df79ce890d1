use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::DeclFormat;

/// File name searched for when no explicit config path is given.
pub const CONFIG_FILE: &str = "bemdecl.toml";

/// Project configuration loaded from `bemdecl.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Resolver settings from `[resolver]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Only dependency records for this tech (or for no tech) apply.
    #[serde(default)]
    pub tech: Option<String>,
    /// Per-node rollback budget; the node count when unset.
    #[serde(default, rename = "retraction-limit")]
    pub retraction_limit: Option<usize>,
    #[serde(default, rename = "fail-on-rollback")]
    pub fail_on_rollback: bool,
}

/// Output settings from `[output]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: DeclFormat,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: DeclFormat::default(),
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load and parse a config file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| bemdecl_util::errors::BemError::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
        Self::parse_toml(&content)
    }

    /// Parse config from a TOML string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            bemdecl_util::errors::BemError::Config {
                message: format!("Failed to parse {CONFIG_FILE}: {e}"),
            }
            .into()
        })
    }

    /// Load `explicit` if given, otherwise the nearest `bemdecl.toml` above
    /// `start`, otherwise defaults.
    pub fn discover(start: &Path, explicit: Option<&Path>) -> miette::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_path(path)?, Some(path.to_path_buf())));
        }
        match bemdecl_util::fs::find_ancestor_with(start, CONFIG_FILE) {
            Some(dir) => {
                let path = dir.join(CONFIG_FILE);
                tracing::debug!("using config {}", path.display());
                Ok((Self::from_path(&path)?, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }
}
