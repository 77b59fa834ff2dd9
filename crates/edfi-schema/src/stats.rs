//! Summary statistics for an analyzed document

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzer::EntityGraph;
use crate::domains::DomainClassification;

/// Counts describing an entity graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub entity_count: usize,
    pub relationship_count: usize,
    /// Relationship count keyed by cardinality tag
    pub relationship_types: BTreeMap<String, usize>,
    /// Entity count keyed by domain; empty when no classification was given
    pub domains: BTreeMap<String, usize>,
}

impl GraphStatistics {
    pub fn from_graph(graph: &EntityGraph, classification: Option<&DomainClassification>) -> Self {
        let mut relationship_types = BTreeMap::new();
        for relationship in graph.relationships() {
            *relationship_types
                .entry(relationship.cardinality.as_str().to_string())
                .or_insert(0) += 1;
        }

        Self {
            entity_count: graph.entity_count(),
            relationship_count: graph.relationship_count(),
            relationship_types,
            domains: classification.map(|c| c.counts()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Entity, Relationship};
    use crate::core::Cardinality;

    fn sample_graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.add_entity(Entity::new("Student"));
        graph.add_entity(Entity::new("School"));
        graph.add_entity(Entity::new("Address"));
        graph.add_relationship(Relationship::new(
            "Student",
            "School",
            Cardinality::OneToOne,
            "schoolReference",
        ));
        graph.add_relationship(Relationship::new(
            "Student",
            "Address",
            Cardinality::OneToMany,
            "addresses",
        ));
        graph.add_relationship(Relationship::new(
            "School",
            "Address",
            Cardinality::OneToMany,
            "addresses",
        ));
        graph
    }

    #[test]
    fn test_counts_by_cardinality() {
        let stats = GraphStatistics::from_graph(&sample_graph(), None);
        assert_eq!(stats.entity_count, 3);
        assert_eq!(stats.relationship_count, 3);
        assert_eq!(stats.relationship_types.get("one-to-one"), Some(&1));
        assert_eq!(stats.relationship_types.get("one-to-many"), Some(&2));
        assert!(stats.domains.is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let stats = GraphStatistics::from_graph(&EntityGraph::new(), None);
        assert_eq!(stats, GraphStatistics::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = GraphStatistics::from_graph(&sample_graph(), None);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["entityCount"], 3);
        assert_eq!(json["relationshipTypes"]["one-to-many"], 2);
    }
}
