//! Version-keyed Ed-Fi domain taxonomy
//!
//! A taxonomy is an ordered list of [`DomainRecord`]s per data standard
//! version. The built-in registry is compiled from `data/edfi_domains.json`;
//! custom registries can be loaded from JSON of the same shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error};

use crate::core::{SchemaError, SchemaResult};

const BUILTIN_TAXONOMY: &str = include_str!("../../data/edfi_domains.json");

/// Data standard version used when none is requested
pub const DEFAULT_VERSION: &str = "5.2";

/// One subject-area domain and the schema names that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub associations: Vec<String>,
}

impl DomainRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            entities: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn with_entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_associations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associations = names.into_iter().map(Into::into).collect();
        self
    }

    /// Entity names followed by association names
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .chain(self.associations.iter())
            .map(String::as_str)
    }
}

/// Registry of taxonomies keyed by data standard version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyRegistry {
    versions: BTreeMap<String, Vec<DomainRecord>>,
}

impl TaxonomyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the embedded Ed-Fi taxonomy
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_TAXONOMY).unwrap_or_else(|e| {
            error!(error = %e, "Embedded taxonomy failed to parse");
            Self::new()
        })
    }

    /// Parse a registry from `{ "<version>": [DomainRecord, ...], ... }`
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let versions: BTreeMap<String, Vec<DomainRecord>> = serde_json::from_str(json)?;
        debug!(versions = versions.len(), "Loaded taxonomy");
        Ok(Self { versions })
    }

    /// Load a registry from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Register (or replace) the taxonomy for a version
    pub fn insert(&mut self, version: impl Into<String>, records: Vec<DomainRecord>) {
        self.versions.insert(version.into(), records);
    }

    /// Add every version from `other`, replacing versions present in both
    pub fn merge(&mut self, other: TaxonomyRegistry) {
        self.versions.extend(other.versions);
    }

    /// Available versions in sorted order
    pub fn versions(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Domain records for `version`
    pub fn lookup(&self, version: &str) -> SchemaResult<&[DomainRecord]> {
        self.versions
            .get(version)
            .map(Vec::as_slice)
            .ok_or_else(|| SchemaError::unsupported_version(version, self.versions()))
    }
}
