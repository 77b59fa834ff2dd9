//! Core error types for schema analysis and diagram generation
//!
//! Analysis itself never fails: malformed documents degrade to empty values.
//! The errors below come from rendering, taxonomy lookup, and the I/O
//! collaborators that load specification documents.

use thiserror::Error;

/// Core error type for the Ed-Fi schema toolkit
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unsupported diagram format: {format} (expected one of: mermaid, plantuml, graphviz)")]
    UnsupportedFormat { format: String },

    #[error("Unsupported data standard version: {version} (available versions: {})", .available.join(", "))]
    UnsupportedVersion {
        version: String,
        available: Vec<String>,
    },

    #[error("Entity not found: {name}")]
    EntityNotFound { name: String },

    #[error("Document parse error: {message}")]
    DocumentParse { message: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("No specification loaded; load an OpenAPI document first")]
    NoDocument,

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Result alias used throughout the library
pub type SchemaResult<T> = Result<T, SchemaError>;

impl SchemaError {
    /// Create a new unsupported-format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a new unsupported-version error; `available` is sorted for display
    pub fn unsupported_version(version: impl Into<String>, mut available: Vec<String>) -> Self {
        available.sort();
        Self::UnsupportedVersion {
            version: version.into(),
            available,
        }
    }

    /// Create a new entity-not-found error
    pub fn entity_not_found(name: impl Into<String>) -> Self {
        Self::EntityNotFound { name: name.into() }
    }

    /// Create a new document parse error
    pub fn document_parse(message: impl Into<String>) -> Self {
        Self::DocumentParse {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}
