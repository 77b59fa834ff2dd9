//! edfi-schema - Entity-relationship analysis for Ed-Fi OpenAPI documents
//!
//! Reads the schema definitions of an OpenAPI document, infers an entity
//! graph from `$ref` usage, groups entities by Ed-Fi domain and renders the
//! graph as Mermaid, PlantUML or Graphviz source.
//!
//! # Quick Start
//!
//! ```rust
//! use edfi_schema::{analyze, render, DiagramFormat, RenderOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "components": { "schemas": {
//!         "Student": { "properties": {
//!             "schoolReference": { "$ref": "#/components/schemas/School" }
//!         }},
//!         "School": {}
//!     }}
//! });
//!
//! let graph = analyze(&doc);
//! assert_eq!(graph.relationship_count(), 1);
//!
//! let mermaid = render(&doc, &RenderOptions::new(DiagramFormat::Mermaid)).unwrap();
//! assert!(mermaid.contains("Student ||--|| School"));
//! ```
//!
//! # Advanced Usage
//!
//! Hosts that answer many queries about one document keep a [`Session`]:
//!
//! ```rust
//! use edfi_schema::prelude::*;
//! use serde_json::json;
//!
//! let mut session = Session::default();
//! session.load_document(json!({ "components": { "schemas": { "edFi_student": {} } } }));
//!
//! let domains = session.classify(Some("5.2")).unwrap();
//! assert!(domains.get("student identification and demographics").is_some());
//! ```

pub mod analyzer;
pub mod config;
pub mod core;
pub mod domains;
pub mod openapi;
pub mod plugins;
pub mod session;
pub mod source;
pub mod stats;

pub use crate::core::*;
pub use analyzer::{Entity, EntityGraph, Property, Relationship, SchemaAnalyzer};
pub use session::Session;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analyzer::{Entity, EntityGraph, Property, Relationship, SchemaAnalyzer};
    pub use crate::config::SourceConfig;
    pub use crate::core::{
        Cardinality, DiagramFormat, GraphView, RenderOptions, Renderer, SchemaError,
        SchemaResult,
    };
    pub use crate::domains::{DomainClassification, DomainClassifier, TaxonomyRegistry};
    pub use crate::openapi::{document_info, list_endpoints, Endpoint};
    pub use crate::plugins::{GraphvizRenderer, MermaidRenderer, Orchestrator, PlantUmlRenderer};
    pub use crate::session::Session;
    pub use crate::source::{SpecCache, SpecSource};
    pub use crate::stats::GraphStatistics;
}

/// Analyze an OpenAPI document into an entity graph
///
/// Analysis never fails; a document without schema definitions yields an
/// empty graph.
pub fn analyze(document: &serde_json::Value) -> EntityGraph {
    SchemaAnalyzer::new().analyze(document)
}

/// Analyze a document and render it in one step
///
/// # Example
/// ```rust
/// use edfi_schema::{render, DiagramFormat, RenderOptions};
/// use serde_json::json;
///
/// let doc = json!({ "components": { "schemas": { "A": {} } } });
/// let dot = render(&doc, &RenderOptions::new(DiagramFormat::Graphviz)).unwrap();
/// assert!(dot.starts_with("digraph EdFiDataModel {"));
/// ```
pub fn render(document: &serde_json::Value, options: &RenderOptions) -> SchemaResult<String> {
    let graph = analyze(document);
    plugins::Orchestrator::with_all_plugins().render(&graph, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analyze_empty_document() {
        let graph = analyze(&json!({}));
        assert!(graph.is_empty());
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_render_each_format() {
        let doc = json!({ "components": { "schemas": {
            "Student": { "properties": { "id": { "type": "string" } } }
        }}});
        for format in [DiagramFormat::Mermaid, DiagramFormat::PlantUml, DiagramFormat::Graphviz] {
            let result = render(&doc, &RenderOptions::new(format));
            assert!(result.is_ok());
            assert!(result.unwrap().contains("Student"));
        }
    }
}
