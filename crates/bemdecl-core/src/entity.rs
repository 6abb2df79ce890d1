//! BEM entity identity and notation.
//!
//! Entities are written in the classic naming scheme: elements are separated
//! from their block by `__`, modifiers by `_`:
//!
//! ```text
//! button                 block
//! button_size_m          block modifier with a value
//! button_disabled        boolean block modifier
//! button__text           element
//! button__text_bold      boolean element modifier
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedEntity;

const ELEM_DELIM: &str = "__";
const MOD_DELIM: char = '_';

/// A block, element, or modifier of either.
///
/// Identity is the exact `(block, elem, mod_name, mod_val)` tuple. A missing
/// `mod_val` on a present `mod_name` is a boolean modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BemEntity {
    block: String,
    elem: Option<String>,
    mod_name: Option<String>,
    mod_val: Option<String>,
}

impl BemEntity {
    /// Build an entity from its parts, validating every identifier.
    pub fn new(
        block: &str,
        elem: Option<&str>,
        mod_name: Option<&str>,
        mod_val: Option<&str>,
    ) -> Result<Self, MalformedEntity> {
        let notation = || render(block, elem, mod_name, mod_val);
        if mod_val.is_some() && mod_name.is_none() {
            return Err(MalformedEntity::new(
                notation(),
                "modifier value without modifier name",
            ));
        }
        check_ident(block, "block", &notation)?;
        if let Some(e) = elem {
            check_ident(e, "element", &notation)?;
        }
        if let Some(m) = mod_name {
            check_ident(m, "modifier name", &notation)?;
        }
        if let Some(v) = mod_val {
            check_ident(v, "modifier value", &notation)?;
        }
        Ok(Self {
            block: block.to_string(),
            elem: elem.map(str::to_string),
            mod_name: mod_name.map(str::to_string),
            mod_val: mod_val.map(str::to_string),
        })
    }

    /// A bare block.
    pub fn block(name: &str) -> Result<Self, MalformedEntity> {
        Self::new(name, None, None, None)
    }

    /// A bare element of `block`.
    pub fn elem(block: &str, elem: &str) -> Result<Self, MalformedEntity> {
        Self::new(block, Some(elem), None, None)
    }

    /// Parse canonical notation (`block__elem_mod_val`).
    pub fn parse(notation: &str) -> Result<Self, MalformedEntity> {
        if notation.is_empty() {
            return Err(MalformedEntity::new(notation, "empty notation"));
        }

        let mut parts = notation.split(ELEM_DELIM);
        let block_part = parts.next().unwrap_or_default();
        let elem_part = parts.next();
        if parts.next().is_some() {
            return Err(MalformedEntity::new(
                notation,
                "more than one element delimiter",
            ));
        }

        let (block, elem, mods) = match elem_part {
            Some(elem_part) => {
                if block_part.contains(MOD_DELIM) {
                    return Err(MalformedEntity::new(
                        notation,
                        "block modifier in front of an element",
                    ));
                }
                let mut it = elem_part.splitn(2, MOD_DELIM);
                let elem = it.next().unwrap_or_default();
                (block_part, Some(elem), it.next())
            }
            None => {
                let mut it = block_part.splitn(2, MOD_DELIM);
                let block = it.next().unwrap_or_default();
                (block, None, it.next())
            }
        };

        let (mod_name, mod_val) = match mods {
            None => (None, None),
            Some(mods) => {
                let mut it = mods.split(MOD_DELIM);
                let name = it.next();
                let val = it.next();
                if it.next().is_some() {
                    return Err(MalformedEntity::new(notation, "too many modifier parts"));
                }
                (name, val)
            }
        };

        Self::new(block, elem, mod_name, mod_val).map_err(|e| e.with_notation(notation))
    }

    /// The same scope (block or element) with a modifier attached.
    pub fn with_mod(&self, name: &str, val: Option<&str>) -> Result<Self, MalformedEntity> {
        Self::new(&self.block, self.elem.as_deref(), Some(name), val)
    }

    pub fn block_name(&self) -> &str {
        &self.block
    }

    pub fn elem_name(&self) -> Option<&str> {
        self.elem.as_deref()
    }

    pub fn mod_name(&self) -> Option<&str> {
        self.mod_name.as_deref()
    }

    pub fn mod_val(&self) -> Option<&str> {
        self.mod_val.as_deref()
    }

    pub fn is_block(&self) -> bool {
        self.elem.is_none() && self.mod_name.is_none()
    }

    pub fn is_elem(&self) -> bool {
        self.elem.is_some() && self.mod_name.is_none()
    }

    pub fn is_mod(&self) -> bool {
        self.mod_name.is_some()
    }

    /// The entity this one qualifies: a modifier's block or element.
    pub fn scope(&self) -> Self {
        Self {
            block: self.block.clone(),
            elem: self.elem.clone(),
            mod_name: None,
            mod_val: None,
        }
    }
}

fn check_ident(
    ident: &str,
    what: &str,
    notation: &dyn Fn() -> String,
) -> Result<(), MalformedEntity> {
    if ident.is_empty() {
        return Err(MalformedEntity::new(notation(), format!("empty {what}")));
    }
    if let Some(c) = ident
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
    {
        return Err(MalformedEntity::new(
            notation(),
            format!("invalid character {c:?} in {what} `{ident}`"),
        ));
    }
    Ok(())
}

fn render(block: &str, elem: Option<&str>, mod_name: Option<&str>, mod_val: Option<&str>) -> String {
    let mut out = block.to_string();
    if let Some(e) = elem {
        out.push_str(ELEM_DELIM);
        out.push_str(e);
    }
    if let Some(m) = mod_name {
        out.push(MOD_DELIM);
        out.push_str(m);
    }
    if let Some(v) = mod_val {
        out.push(MOD_DELIM);
        out.push_str(v);
    }
    out
}

impl fmt::Display for BemEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(
            &self.block,
            self.elem.as_deref(),
            self.mod_name.as_deref(),
            self.mod_val.as_deref(),
        ))
    }
}

impl FromStr for BemEntity {
    type Err = MalformedEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BemEntity {
    type Error = MalformedEntity;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<BemEntity> for String {
    fn from(e: BemEntity) -> Self {
        e.to_string()
    }
}

/// Modifier value as written in flat `deps` records and BEMJSON: a string,
/// or `true` for a boolean modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModValue {
    Flag(bool),
    Text(String),
}

/// An externally supplied reference to an entity that has not been validated
/// yet: either canonical notation or a flat `{ block, elem, mod, val }` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Notation(String),
    Fields {
        block: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elem: Option<String>,
        #[serde(default, rename = "mod", skip_serializing_if = "Option::is_none")]
        mod_name: Option<String>,
        #[serde(default, rename = "val", skip_serializing_if = "Option::is_none")]
        mod_val: Option<ModValue>,
    },
}

impl EntityRef {
    /// Validate the reference into an entity.
    pub fn to_entity(&self) -> Result<BemEntity, MalformedEntity> {
        match self {
            EntityRef::Notation(s) => BemEntity::parse(s),
            EntityRef::Fields {
                block,
                elem,
                mod_name,
                mod_val,
            } => {
                let val = match mod_val {
                    None | Some(ModValue::Flag(true)) => None,
                    Some(ModValue::Flag(false)) => {
                        return Err(MalformedEntity::new(
                            render(block, elem.as_deref(), mod_name.as_deref(), None),
                            "modifier value `false` names no entity",
                        ))
                    }
                    Some(ModValue::Text(v)) => Some(v.as_str()),
                };
                if mod_val.is_some() && mod_name.is_none() {
                    return Err(MalformedEntity::new(
                        render(block, elem.as_deref(), None, val),
                        "modifier value without modifier name",
                    ));
                }
                BemEntity::new(block, elem.as_deref(), mod_name.as_deref(), val)
            }
        }
    }
}

impl From<&BemEntity> for EntityRef {
    fn from(e: &BemEntity) -> Self {
        EntityRef::Notation(e.to_string())
    }
}
