//! Text encodings of declarations.
//!
//! Decoding is a pure function of the input text; nothing is cached or
//! evaluated. Two shapes are understood:
//!
//! - `bemdecl`: `{"blocks": [{ "name", "mods", "elems" }]}`
//! - `deps`: `{"deps": [{ "block", "elem", "mod", "val", "tech" }]}`
//!
//! A bare JSON array of either record kind is accepted as well.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::declaration::{BlockDecl, Declaration, DepsItem};
use crate::error::DeclError;

/// Output shape of an encoded declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclFormat {
    #[default]
    Bemdecl,
    Deps,
}

impl fmt::Display for DeclFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclFormat::Bemdecl => f.write_str("bemdecl"),
            DeclFormat::Deps => f.write_str("deps"),
        }
    }
}

impl FromStr for DeclFormat {
    type Err = DeclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bemdecl" => Ok(DeclFormat::Bemdecl),
            "deps" => Ok(DeclFormat::Deps),
            other => Err(DeclError::Shape(format!("unknown format `{other}`"))),
        }
    }
}

#[derive(Serialize)]
struct BlocksFile<'a> {
    blocks: &'a [BlockDecl],
}

#[derive(Serialize)]
struct DepsFile<'a> {
    deps: &'a [DepsItem],
}

/// Decode a declaration from JSON text.
pub fn parse_declaration(text: &str) -> Result<Declaration, DeclError> {
    let value: Value = serde_json::from_str(text)?;
    from_value(value)
}

/// Decode a declaration from an already parsed JSON value.
pub fn from_value(value: Value) -> Result<Declaration, DeclError> {
    match value {
        Value::Object(mut map) => {
            if let Some(blocks) = map.remove("blocks") {
                let blocks: Vec<BlockDecl> = serde_json::from_value(blocks)?;
                Ok(Declaration::from_blocks(&blocks)?)
            } else if let Some(deps) = map.remove("deps") {
                let items: Vec<DepsItem> = serde_json::from_value(deps)?;
                Ok(Declaration::from_deps(&items)?)
            } else {
                Err(DeclError::Shape(
                    "object without `blocks` or `deps` key".to_string(),
                ))
            }
        }
        Value::Array(records) => {
            let Some(first) = records.first() else {
                return Ok(Declaration::new());
            };
            if first.get("name").is_some() {
                let blocks: Vec<BlockDecl> = serde_json::from_value(Value::Array(records))?;
                Ok(Declaration::from_blocks(&blocks)?)
            } else if first.get("block").is_some() {
                let items: Vec<DepsItem> = serde_json::from_value(Value::Array(records))?;
                Ok(Declaration::from_deps(&items)?)
            } else {
                Err(DeclError::Shape(
                    "records need a `name` or `block` field".to_string(),
                ))
            }
        }
        other => Err(DeclError::Shape(format!("expected object or array, got {other}"))),
    }
}

/// Encode a declaration as JSON in the given shape.
pub fn to_json(decl: &Declaration, format: DeclFormat, pretty: bool) -> Result<String, DeclError> {
    let text = match (format, pretty) {
        (DeclFormat::Bemdecl, true) => serde_json::to_string_pretty(&BlocksFile {
            blocks: &decl.to_blocks(),
        })?,
        (DeclFormat::Bemdecl, false) => serde_json::to_string(&BlocksFile {
            blocks: &decl.to_blocks(),
        })?,
        (DeclFormat::Deps, true) => serde_json::to_string_pretty(&DepsFile {
            deps: &decl.to_deps(),
        })?,
        (DeclFormat::Deps, false) => serde_json::to_string(&DepsFile {
            deps: &decl.to_deps(),
        })?,
    };
    Ok(text)
}
