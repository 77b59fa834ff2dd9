//! Schema analyzer
//!
//! Turns an OpenAPI document into an [`EntityGraph`] in two passes over the
//! schema definitions: first every schema becomes an entity, then every
//! reference-shaped property becomes a relationship if its target is one of
//! those entities. Edges to unknown schemas are dropped.

mod graph;
mod references;

pub use graph::{Entity, EntityGraph, Property, Relationship, ARRAY_TYPE, REFERENCE_TYPE};
pub use references::{ref_name, resolve_reference, ReferenceKind, ReferenceMatch, MATCHERS};

use serde_json::{Map, Value};
use tracing::{debug, info, span, trace, Level};

/// Type recorded for properties that declare none
pub const DEFAULT_PROPERTY_TYPE: &str = "object";

/// Builds entity graphs from OpenAPI documents
///
/// The analyzer is stateless; the graph it produces belongs to the caller.
///
/// # Example
/// ```
/// use edfi_schema::analyzer::SchemaAnalyzer;
/// use serde_json::json;
///
/// let doc = json!({
///     "components": { "schemas": {
///         "Student": { "properties": {
///             "schoolReference": { "$ref": "#/components/schemas/School" }
///         }},
///         "School": {}
///     }}
/// });
/// let graph = SchemaAnalyzer::new().analyze(&doc);
/// assert_eq!(graph.entity_count(), 2);
/// assert_eq!(graph.relationship_count(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaAnalyzer;

impl SchemaAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a document into a fresh graph
    pub fn analyze(&self, document: &Value) -> EntityGraph {
        let mut graph = EntityGraph::new();
        self.analyze_into(document, &mut graph);
        graph
    }

    /// Replace the contents of `graph` with the analysis of `document`
    ///
    /// Prior contents are always discarded, even when the document has no
    /// schema definitions.
    pub fn analyze_into(&self, document: &Value, graph: &mut EntityGraph) {
        let analyze_span = span!(Level::INFO, "analyze_document");
        let _enter = analyze_span.enter();

        graph.clear();

        let Some(schemas) = schema_definitions(document) else {
            info!("Document has no schema definitions");
            return;
        };

        trace!(schema_count = schemas.len(), "Starting entity extraction");
        for (name, schema) in schemas {
            graph.add_entity(extract_entity(name, schema));
        }
        debug!(entity_count = graph.entity_count(), "Extracted entities");

        for (name, schema) in schemas {
            extract_relationships(name, schema, graph);
        }
        debug!(
            relationship_count = graph.relationship_count(),
            "Extracted relationships"
        );

        info!(
            entities = graph.entity_count(),
            relationships = graph.relationship_count(),
            "Analysis completed"
        );
    }
}

/// Locate the schema-definitions map
///
/// OpenAPI 3 keeps it under `components.schemas`; Swagger 2 documents
/// published by older ODS/API releases use top-level `definitions`.
pub fn schema_definitions(document: &Value) -> Option<&Map<String, Value>> {
    document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .or_else(|| document.get("definitions").and_then(Value::as_object))
}

fn properties_of(schema: &Value) -> impl Iterator<Item = (&String, &Value)> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn extract_entity(name: &str, schema: &Value) -> Entity {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut entity = Entity::new(name);
    entity.description = string_field(schema, "description")
        .or_else(|| string_field(schema, "title"))
        .map(str::to_string);

    for (prop_name, prop) in properties_of(schema) {
        let mut property = Property::new(
            prop_name.as_str(),
            string_field(prop, "type").unwrap_or(DEFAULT_PROPERTY_TYPE),
        )
        .with_required(required.contains(&prop_name.as_str()));
        if let Some(description) = string_field(prop, "description") {
            property = property.with_description(description);
        }
        if let Some(format) = string_field(prop, "format") {
            property = property.with_format(format);
        }
        if let Some(found) = resolve_reference(prop) {
            property.property_type = found.kind.property_type().to_string();
            property = property.with_reference(found.target);
        }

        entity.add_property(property);
    }

    entity
}

fn extract_relationships(from: &str, schema: &Value, graph: &mut EntityGraph) {
    for (prop_name, prop) in properties_of(schema) {
        let Some(found) = resolve_reference(prop) else {
            continue;
        };

        if !graph.contains(found.target) {
            trace!(
                from,
                property = prop_name.as_str(),
                target = found.target,
                "Dropping reference to unknown schema"
            );
            continue;
        }

        let mut relationship =
            Relationship::new(from, found.target, found.kind.cardinality(), prop_name.as_str());
        relationship.description = string_field(prop, "description").map(str::to_string);
        graph.add_relationship(relationship);
    }
}
