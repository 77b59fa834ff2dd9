//! Integration tests for schema analysis
//!
//! Each test feeds a small OpenAPI document through the analyzer and checks
//! the resulting entity graph.

use edfi_schema::analyzer::{SchemaAnalyzer, ARRAY_TYPE, REFERENCE_TYPE};
use edfi_schema::{analyze, Cardinality, EntityGraph};
use serde_json::json;

#[test]
fn test_direct_reference_is_one_to_one() {
    let doc = json!({
        "components": { "schemas": {
            "Student": { "properties": {
                "schoolReference": { "$ref": "#/components/schemas/School" }
            }},
            "School": {}
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.entity_count(), 2);
    assert_eq!(graph.relationship_count(), 1);

    let rel = &graph.relationships()[0];
    assert_eq!(rel.from_entity, "Student");
    assert_eq!(rel.to_entity, "School");
    assert_eq!(rel.cardinality, Cardinality::OneToOne);
    assert_eq!(rel.property, "schoolReference");
}

#[test]
fn test_array_reference_is_one_to_many() {
    let doc = json!({
        "components": { "schemas": {
            "Student": { "properties": {
                "schools": { "type": "array", "items": { "$ref": "#/components/schemas/School" } }
            }},
            "School": {}
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.relationship_count(), 1);
    assert_eq!(graph.relationships()[0].cardinality, Cardinality::OneToMany);

    let prop = graph.entity("Student").unwrap().property("schools").unwrap();
    assert_eq!(prop.property_type, ARRAY_TYPE);
    assert_eq!(prop.reference.as_deref(), Some("School"));
}

#[test]
fn test_dangling_reference_is_dropped() {
    let doc = json!({
        "components": { "schemas": {
            "Student": { "properties": {
                "ghostReference": { "$ref": "#/components/schemas/Ghost" }
            }}
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.entity_count(), 1);
    assert_eq!(graph.relationship_count(), 0);

    // The property still records where it points
    let prop = graph.entity("Student").unwrap().property("ghostReference").unwrap();
    assert_eq!(prop.property_type, REFERENCE_TYPE);
    assert_eq!(prop.reference.as_deref(), Some("Ghost"));
}

#[test]
fn test_all_of_first_member_only() {
    let doc = json!({
        "components": { "schemas": {
            "Student": { "properties": {
                "calendar": { "allOf": [
                    { "$ref": "#/components/schemas/Calendar" },
                    { "$ref": "#/components/schemas/School" }
                ]},
                "other": { "allOf": [
                    { "description": "no reference here" },
                    { "$ref": "#/components/schemas/School" }
                ]}
            }},
            "Calendar": {},
            "School": {}
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.relationship_count(), 1);
    assert_eq!(graph.relationships()[0].to_entity, "Calendar");
    assert!(graph.entity("Student").unwrap().property("other").unwrap().reference.is_none());
}

#[test]
fn test_forward_references_resolve() {
    // Referencing schema precedes its target in document order
    let doc = json!({
        "components": { "schemas": {
            "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "properties": { "a": { "$ref": "#/components/schemas/A" } } }
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.relationship_count(), 2);
    assert_eq!(graph.outgoing("A").count(), 1);
    assert_eq!(graph.incoming("A").count(), 1);
}

#[test]
fn test_entity_details() {
    let doc = json!({
        "components": { "schemas": {
            "Student": {
                "title": "A learner",
                "required": ["firstName"],
                "properties": {
                    "firstName": { "type": "string", "description": "Given name", "format": "name" },
                    "metadata": {}
                }
            },
            "School": { "description": "An institution", "title": "ignored" }
        }}
    });

    let graph = analyze(&doc);
    let student = graph.entity("Student").unwrap();
    assert_eq!(student.description.as_deref(), Some("A learner"));

    let first = student.property("firstName").unwrap();
    assert!(first.required);
    assert_eq!(first.property_type, "string");
    assert_eq!(first.description.as_deref(), Some("Given name"));
    assert_eq!(first.format.as_deref(), Some("name"));

    let metadata = student.property("metadata").unwrap();
    assert!(!metadata.required);
    assert_eq!(metadata.property_type, "object");

    assert_eq!(
        graph.entity("School").unwrap().description.as_deref(),
        Some("An institution")
    );
}

#[test]
fn test_permissive_on_malformed_input() {
    let doc = json!({
        "components": { "schemas": {
            "Weird": "not an object",
            "NoProps": { "properties": 42 },
            "BadRequired": { "required": "firstName", "properties": { "firstName": { "type": "string" } } }
        }}
    });

    let graph = analyze(&doc);
    assert_eq!(graph.entity_count(), 3);
    assert!(graph.entity("Weird").unwrap().properties.is_empty());
    assert!(graph.entity("NoProps").unwrap().properties.is_empty());
    assert!(!graph.entity("BadRequired").unwrap().property("firstName").unwrap().required);
}

#[test]
fn test_missing_schemas_yields_empty_graph() {
    assert!(analyze(&json!({ "openapi": "3.0.0" })).is_empty());
    assert!(analyze(&json!({ "components": {} })).is_empty());
    assert!(analyze(&json!(null)).is_empty());
}

#[test]
fn test_swagger_definitions_fallback() {
    let doc = json!({
        "swagger": "2.0",
        "definitions": {
            "edFi_student": { "properties": {
                "schoolReference": { "$ref": "#/definitions/edFi_school" }
            }},
            "edFi_school": {}
        }
    });

    let graph = analyze(&doc);
    assert_eq!(graph.entity_count(), 2);
    assert_eq!(graph.relationships()[0].to_entity, "edFi_school");
}

#[test]
fn test_analyze_into_replaces_previous_graph() {
    let analyzer = SchemaAnalyzer::new();
    let mut graph = EntityGraph::new();

    analyzer.analyze_into(
        &json!({ "components": { "schemas": {
            "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": {}
        }}}),
        &mut graph,
    );
    assert_eq!(graph.entity_count(), 2);

    analyzer.analyze_into(&json!({ "components": { "schemas": { "C": {} } } }), &mut graph);
    assert_eq!(graph.entity_names().collect::<Vec<_>>(), vec!["C"]);
    assert_eq!(graph.relationship_count(), 0);

    analyzer.analyze_into(&json!({}), &mut graph);
    assert!(graph.is_empty());
}

#[test]
fn test_entities_keep_document_order() {
    let doc = json!({ "components": { "schemas": { "Zeta": {}, "Alpha": {}, "Mu": {} } } });
    let graph = analyze(&doc);
    assert_eq!(graph.entity_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mu"]);
}
