//! The dependency provider boundary and an in-memory implementation.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use bemdecl_core::entity::EntityRef;
use bemdecl_core::BemEntity;
use serde::{Deserialize, Serialize};

/// Dependencies of one entity as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub entity: BemEntity,
    /// Entities that must come strictly before `entity`.
    #[serde(default)]
    pub must: Vec<EntityRef>,
    /// Entities that must be present, in any position.
    #[serde(default)]
    pub should: Vec<EntityRef>,
    /// Restrict the record to one tech; `None` applies everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<String>,
}

impl DependencyRecord {
    pub fn new(entity: BemEntity) -> Self {
        Self {
            entity,
            must: Vec::new(),
            should: Vec::new(),
            tech: None,
        }
    }

    pub fn must(mut self, dep: &BemEntity) -> Self {
        self.must.push(EntityRef::from(dep));
        self
    }

    pub fn should(mut self, dep: &BemEntity) -> Self {
        self.should.push(EntityRef::from(dep));
        self
    }

    pub fn for_tech(mut self, tech: impl Into<String>) -> Self {
        self.tech = Some(tech.into());
        self
    }

    /// Whether the record applies when resolving for `tech`.
    pub fn applies_to(&self, tech: Option<&str>) -> bool {
        match (&self.tech, tech) {
            (None, _) => true,
            (Some(own), Some(wanted)) => own == wanted,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ProviderError {
    #[error("failed to fetch dependencies of `{entity}`: {reason}")]
    #[diagnostic(code(bemdecl::provider::entity))]
    Entity { entity: BemEntity, reason: String },

    #[error("failed to load dependency records from {path}: {message}")]
    #[diagnostic(
        code(bemdecl::provider::load),
        help("the records file must be a JSON array of objects with `entity`, `must`, `should` and `tech` fields")
    )]
    Load { path: String, message: String },

    #[error("{0}")]
    #[diagnostic(code(bemdecl::provider::other))]
    Other(String),
}

/// Source of dependency records.
///
/// The resolver calls `fetch` once per breadth-first round with every entity
/// of that round. Entities the provider knows nothing about simply get no
/// record. An error aborts the whole resolution.
#[async_trait]
pub trait DependencyProvider: Send + Sync {
    async fn fetch(&self, entities: &[BemEntity]) -> Result<Vec<DependencyRecord>, ProviderError>;
}

/// A provider answering from records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: HashMap<BemEntity, Vec<DependencyRecord>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = DependencyRecord>) -> Self {
        let mut provider = Self::new();
        for record in records {
            provider.insert(record);
        }
        provider
    }

    pub fn insert(&mut self, record: DependencyRecord) {
        self.records
            .entry(record.entity.clone())
            .or_default()
            .push(record);
    }

    /// Parse a JSON array of records.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<DependencyRecord> = serde_json::from_str(text)?;
        Ok(Self::from_records(records))
    }

    /// Load a JSON array of records from a file.
    pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path).map_err(|e| ProviderError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let provider = Self::from_json(&text).map_err(|e| ProviderError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            "loaded dependency records for {} entities from {}",
            provider.records.len(),
            path.display()
        );
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DependencyProvider for StaticProvider {
    async fn fetch(&self, entities: &[BemEntity]) -> Result<Vec<DependencyRecord>, ProviderError> {
        Ok(entities
            .iter()
            .filter_map(|entity| self.records.get(entity))
            .flatten()
            .cloned()
            .collect())
    }
}
