//! Entity graph built from an OpenAPI document
//!
//! Stores entities in document order together with the relationships
//! derived from their properties. The graph is a plain value owned by the
//! caller; re-analysis produces a new graph rather than patching this one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::Cardinality;

/// Type tag for a property that points at a single related entity
pub const REFERENCE_TYPE: &str = "reference";
/// Type tag for a property holding a collection of related entities
pub const ARRAY_TYPE: &str = "array";

/// An attribute of an [`Entity`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Declared OpenAPI type, or `reference` / `array` for relationships
    #[serde(rename = "type")]
    pub property_type: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Name of the referenced entity, when the property is a relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: property_type.into(),
            required: false,
            description: None,
            format: None,
            reference: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// A named schema definition treated as a graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.required)
    }
}

/// A directed, cardinality-typed edge between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from_entity: String,
    pub to_entity: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    /// Originating property on `from_entity`
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        cardinality: Cardinality,
        property: impl Into<String>,
    ) -> Self {
        Self {
            from_entity: from.into(),
            to_entity: to.into(),
            cardinality,
            property: property.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True if either endpoint is `name`
    pub fn touches(&self, name: &str) -> bool {
        self.from_entity == name || self.to_entity == name
    }
}

/// Insertion-ordered entity map plus the relationships between entities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityGraph {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any existing entity with the same name in place
    pub fn add_entity(&mut self, entity: Entity) {
        match self.index.get(&entity.name) {
            Some(&position) => self.entities[position] = entity,
            None => {
                self.index.insert(entity.name.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    /// Append a relationship; endpoints are not checked here
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&position| &self.entities[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entities in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.name.as_str())
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Relationships originating at `name`
    pub fn outgoing<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.from_entity == name)
    }

    /// Relationships pointing at `name`
    pub fn incoming<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.to_entity == name)
    }

    pub fn relationships_of_type(
        &self,
        cardinality: Cardinality,
    ) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.cardinality == cardinality)
    }

    /// Entities whose name contains `query`, case-insensitively
    pub fn search(&self, query: &str) -> Vec<&Entity> {
        let needle = query.to_lowercase();
        self.entities
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove all entities and relationships
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
        self.relationships.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school_graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        let mut student = Entity::new("Student");
        student.add_property(Property::new("firstName", "string").with_required(true));
        student.add_property(
            Property::new("schoolReference", REFERENCE_TYPE).with_reference("School"),
        );
        graph.add_entity(student);
        graph.add_entity(Entity::new("School"));
        graph.add_relationship(Relationship::new(
            "Student",
            "School",
            Cardinality::OneToOne,
            "schoolReference",
        ));
        graph
    }

    #[test]
    fn test_entities_keep_insertion_order() {
        let mut graph = EntityGraph::new();
        graph.add_entity(Entity::new("Zeta"));
        graph.add_entity(Entity::new("Alpha"));
        graph.add_entity(Entity::new("Mu"));

        let names: Vec<_> = graph.entity_names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_add_entity_replaces_same_name() {
        let mut graph = EntityGraph::new();
        graph.add_entity(Entity::new("Student"));
        graph.add_entity(Entity::new("School"));
        graph.add_entity(Entity::new("Student").with_description("replaced"));

        assert_eq!(graph.entity_count(), 2);
        assert_eq!(graph.entities()[0].name, "Student");
        assert_eq!(
            graph.entity("Student").unwrap().description.as_deref(),
            Some("replaced")
        );
    }

    #[test]
    fn test_relationship_queries() {
        let graph = school_graph();
        assert_eq!(graph.outgoing("Student").count(), 1);
        assert_eq!(graph.incoming("School").count(), 1);
        assert_eq!(graph.incoming("Student").count(), 0);
        assert_eq!(graph.relationships_of_type(Cardinality::OneToOne).count(), 1);
        assert_eq!(graph.relationships_of_type(Cardinality::OneToMany).count(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let graph = school_graph();
        let hits = graph.search("SCHOOL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "School");
    }

    #[test]
    fn test_required_properties() {
        let graph = school_graph();
        let student = graph.entity("Student").unwrap();
        let required: Vec<_> = student.required_properties().map(|p| &p.name).collect();
        assert_eq!(required, vec!["firstName"]);
        assert!(student.property("schoolReference").unwrap().is_reference());
    }

    #[test]
    fn test_clear() {
        let mut graph = school_graph();
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.relationship_count(), 0);
        assert!(!graph.contains("Student"));
    }

    #[test]
    fn test_relationship_serializes_camel_case() {
        let rel = Relationship::new("Student", "School", Cardinality::OneToMany, "schools");
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["fromEntity"], "Student");
        assert_eq!(json["toEntity"], "School");
        assert_eq!(json["type"], "one-to-many");
        assert!(json.get("description").is_none());
    }
}
