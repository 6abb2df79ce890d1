//! Declarations: ordered, duplicate-free sets of entities an artifact needs.
//!
//! The flattened [`Declaration`] is the canonical form consumed by the set
//! algebra and the resolver. The nested `bemdecl` records ([`BlockDecl`]) and
//! flat `deps` records ([`DepsItem`]) are its two serialized shapes.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::entity::{BemEntity, EntityRef, ModValue};
use crate::error::MalformedEntity;

/// An entity plus the techs it is declared for. An empty tech set means the
/// entry applies to every tech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclEntry {
    pub entity: BemEntity,
    pub techs: BTreeSet<String>,
}

impl DeclEntry {
    pub fn new(entity: BemEntity) -> Self {
        Self {
            entity,
            techs: BTreeSet::new(),
        }
    }

    pub fn with_tech(mut self, tech: impl Into<String>) -> Self {
        self.techs.insert(tech.into());
        self
    }
}

impl From<BemEntity> for DeclEntry {
    fn from(entity: BemEntity) -> Self {
        Self::new(entity)
    }
}

/// An ordered declaration, unique by entity.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    entries: Vec<DeclEntry>,
    index: HashMap<BemEntity, usize>,
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Declaration {}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect entries, folding repeated entities into their first position
    /// and unioning their techs.
    pub fn from_entries<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<DeclEntry>,
    {
        let mut decl = Self::new();
        for entry in entries {
            decl.fold(entry.into());
        }
        decl
    }

    pub(crate) fn fold(&mut self, entry: DeclEntry) {
        match self.index.get(&entry.entity) {
            Some(&pos) => self.entries[pos].techs.extend(entry.techs),
            None => {
                self.index.insert(entry.entity.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn entries(&self) -> &[DeclEntry] {
        &self.entries
    }

    pub fn entities(&self) -> impl Iterator<Item = &BemEntity> {
        self.entries.iter().map(|e| &e.entity)
    }

    pub fn get(&self, entity: &BemEntity) -> Option<&DeclEntry> {
        self.index.get(entity).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, entity: &BemEntity) -> bool {
        self.index.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten nested `bemdecl` records depth-first in declared order.
    pub fn from_blocks(blocks: &[BlockDecl]) -> Result<Self, MalformedEntity> {
        let mut decl = Self::new();
        for block in blocks {
            let scope = BemEntity::block(&block.name)?;
            decl.fold(DeclEntry::new(scope.clone()));
            flatten_mods(&mut decl, &scope, block.mods.as_deref())?;
            for elem in block.elems.iter().flatten() {
                let scope = BemEntity::elem(&block.name, &elem.name)?;
                decl.fold(DeclEntry::new(scope.clone()));
                flatten_mods(&mut decl, &scope, elem.mods.as_deref())?;
            }
        }
        Ok(decl)
    }

    /// Format as nested records, one record per entity.
    pub fn to_blocks(&self) -> Vec<BlockDecl> {
        self.entries.iter().map(|e| BlockDecl::from(&e.entity)).collect()
    }

    /// Build from flat `deps` records.
    pub fn from_deps(items: &[DepsItem]) -> Result<Self, MalformedEntity> {
        let mut decl = Self::new();
        for item in items {
            let mut entry = DeclEntry::new(item.entity_ref().to_entity()?);
            if let Some(tech) = &item.tech {
                entry.techs.insert(tech.clone());
            }
            decl.fold(entry);
        }
        Ok(decl)
    }

    /// Format as flat `deps` records; an entry with several techs yields one
    /// record per tech.
    pub fn to_deps(&self) -> Vec<DepsItem> {
        let mut items = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if entry.techs.is_empty() {
                items.push(DepsItem::new(&entry.entity, None));
            } else {
                for tech in &entry.techs {
                    items.push(DepsItem::new(&entry.entity, Some(tech.clone())));
                }
            }
        }
        items
    }
}

fn flatten_mods(
    decl: &mut Declaration,
    scope: &BemEntity,
    mods: Option<&[ModDecl]>,
) -> Result<(), MalformedEntity> {
    for m in mods.into_iter().flatten() {
        match &m.vals {
            None => decl.fold(DeclEntry::new(scope.with_mod(&m.name, None)?)),
            Some(vals) => {
                for v in vals {
                    decl.fold(DeclEntry::new(scope.with_mod(&m.name, Some(&v.name))?));
                }
            }
        }
    }
    Ok(())
}

/// A nested `bemdecl` block record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Vec<ModDecl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elems: Option<Vec<ElemDecl>>,
}

/// An element inside a [`BlockDecl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElemDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Vec<ModDecl>>,
}

/// A modifier; no `vals` means the boolean modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vals: Option<Vec<ValDecl>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValDecl {
    pub name: String,
}

impl BlockDecl {
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mods: None,
            elems: None,
        }
    }
}

fn mod_decls(entity: &BemEntity) -> Option<Vec<ModDecl>> {
    entity.mod_name().map(|name| {
        vec![ModDecl {
            name: name.to_string(),
            vals: entity.mod_val().map(|v| {
                vec![ValDecl {
                    name: v.to_string(),
                }]
            }),
        }]
    })
}

impl From<&BemEntity> for BlockDecl {
    fn from(entity: &BemEntity) -> Self {
        match entity.elem_name() {
            None => Self {
                name: entity.block_name().to_string(),
                mods: mod_decls(entity),
                elems: None,
            },
            Some(elem) => Self {
                name: entity.block_name().to_string(),
                mods: None,
                elems: Some(vec![ElemDecl {
                    name: elem.to_string(),
                    mods: mod_decls(entity),
                }]),
            },
        }
    }
}

/// A flat `deps` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepsItem {
    pub block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<String>,
    #[serde(default, rename = "mod", skip_serializing_if = "Option::is_none")]
    pub mod_name: Option<String>,
    #[serde(default, rename = "val", skip_serializing_if = "Option::is_none")]
    pub mod_val: Option<ModValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<String>,
}

impl DepsItem {
    fn new(entity: &BemEntity, tech: Option<String>) -> Self {
        let mod_val = entity.mod_name().map(|_| match entity.mod_val() {
            Some(v) => ModValue::Text(v.to_string()),
            None => ModValue::Flag(true),
        });
        Self {
            block: entity.block_name().to_string(),
            elem: entity.elem_name().map(str::to_string),
            mod_name: entity.mod_name().map(str::to_string),
            mod_val,
            tech,
        }
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Fields {
            block: self.block.clone(),
            elem: self.elem.clone(),
            mod_name: self.mod_name.clone(),
            mod_val: self.mod_val.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(s: &str) -> BemEntity {
        BemEntity::parse(s).unwrap()
    }

    #[test]
    fn duplicates_fold_into_first_position() {
        let decl = Declaration::from_entries([
            DeclEntry::new(e("a")).with_tech("css"),
            DeclEntry::new(e("b")),
            DeclEntry::new(e("a")).with_tech("js"),
        ]);
        assert_eq!(decl.len(), 2);
        assert_eq!(decl.entries()[0].entity, e("a"));
        assert_eq!(decl.entries()[0].techs.len(), 2);
    }

    #[test]
    fn flatten_is_depth_first() {
        let blocks: Vec<BlockDecl> = serde_json::from_str(
            r#"[{
                "name": "b",
                "mods": [{ "name": "m", "vals": [{ "name": "1" }, { "name": "2" }] }, { "name": "f" }],
                "elems": [{ "name": "e", "mods": [{ "name": "x" }] }]
            }]"#,
        )
        .unwrap();
        let decl = Declaration::from_blocks(&blocks).unwrap();
        let names: Vec<String> = decl.entities().map(|e| e.to_string()).collect();
        assert_eq!(names, ["b", "b_m_1", "b_m_2", "b_f", "b__e", "b__e_x"]);
    }

    #[test]
    fn boolean_mod_formats_without_vals() {
        let decl = Declaration::from_entries([e("b_f")]);
        let blocks = decl.to_blocks();
        assert_eq!(blocks[0].mods.as_ref().unwrap()[0].vals, None);
    }
}
