//! Integration tests for domain classification against taxonomies

use edfi_schema::domains::{DomainClassifier, DomainRecord, TaxonomyRegistry, OTHER_DOMAIN};
use edfi_schema::{analyze, SchemaError};
use serde_json::json;

fn registry_1_0() -> TaxonomyRegistry {
    let mut registry = TaxonomyRegistry::new();
    registry.insert(
        "1.0",
        vec![
            DomainRecord::new("Enrollment")
                .with_entities(["Student", "School"])
                .with_associations(["StudentSchoolAssociation"]),
            DomainRecord::new("Staff").with_entities(["Staff"]),
        ],
    );
    registry
}

#[test]
fn test_unknown_version_names_available() {
    let registry = registry_1_0();
    let graph = analyze(&json!({ "components": { "schemas": { "Student": {} } } }));

    let err = DomainClassifier::new(&registry)
        .classify(&graph, "bogus")
        .unwrap_err();
    match &err {
        SchemaError::UnsupportedVersion { version, available } => {
            assert_eq!(version, "bogus");
            assert_eq!(available, &vec!["1.0".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("1.0"));
}

#[test]
fn test_classify_with_other_bucket() {
    let registry = registry_1_0();
    let graph = analyze(&json!({ "components": { "schemas": {
        "Student": {}, "School": {}, "StudentSchoolAssociation": {}, "Calendar": {}
    }}}));

    let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();
    assert_eq!(result.domains().collect::<Vec<_>>(), vec!["enrollment", OTHER_DOMAIN]);
    assert_eq!(result.get(OTHER_DOMAIN).unwrap(), &["Calendar"]);
    assert!(result.get("staff").is_none());
}

#[test]
fn test_every_entity_is_placed() {
    let registry = registry_1_0();
    let graph = analyze(&json!({ "components": { "schemas": {
        "Student": {}, "Staff": {}, "Ghost": {}, "Phantom": {}
    }}}));

    let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();
    for name in graph.entity_names() {
        assert!(
            result.iter().any(|(_, members)| members.iter().any(|m| m == name)),
            "{} not placed",
            name
        );
    }
}

#[test]
fn test_classification_does_not_touch_graph() {
    let registry = registry_1_0();
    let graph = analyze(&json!({ "components": { "schemas": { "Student": {} } } }));
    let before = graph.clone();
    let _ = DomainClassifier::new(&registry).classify(&graph, "1.0");
    assert_eq!(graph, before);
}

#[test]
fn test_builtin_taxonomy_versions() {
    let registry = TaxonomyRegistry::builtin();
    assert_eq!(registry.versions(), vec!["4.0".to_string(), "5.2".to_string()]);

    let graph = analyze(&json!({ "components": { "schemas": {
        "edFi_student": {},
        "edFi_school": {},
        "edFi_contact": {},
        "edFi_parent": {},
        "tpdm_candidate": {}
    }}}));

    let v52 = DomainClassifier::new(&registry).classify(&graph, "5.2").unwrap();
    assert!(v52.get("contact").is_some());
    assert!(v52.get("parent").is_none());
    assert!(v52.get(OTHER_DOMAIN).unwrap().contains(&"tpdm_candidate".to_string()));

    let v40 = DomainClassifier::new(&registry).classify(&graph, "4.0").unwrap();
    assert!(v40.get("parent").is_some());
    assert!(v40.get("contact").is_none());
}

#[test]
fn test_custom_taxonomy_from_json() {
    let registry = TaxonomyRegistry::from_json(
        r#"{ "2.0": [ { "name": "Core", "entities": ["A"], "associations": ["AB"] } ] }"#,
    )
    .unwrap();
    let graph = analyze(&json!({ "components": { "schemas": { "A": {}, "AB": {} } } }));
    let result = DomainClassifier::new(&registry).classify(&graph, "2.0").unwrap();
    assert_eq!(result.get("core").unwrap(), &["A", "AB"]);
    assert_eq!(result.len(), 1);
}
