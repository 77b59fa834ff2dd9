//! Domain classifier
//!
//! Groups the entities of an [`EntityGraph`] by subject area using a
//! version-keyed taxonomy. The taxonomy is not a partition: an entity may be
//! listed under several domains. Entities no domain claims go to `other`.

use serde::ser::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, span, Level};

use super::taxonomy::TaxonomyRegistry;
use crate::analyzer::EntityGraph;
use crate::core::SchemaResult;

/// Domain that collects entities missing from the taxonomy
pub const OTHER_DOMAIN: &str = "other";

/// Ordered mapping of lower-cased domain name to entity names
///
/// Domains appear in taxonomy order with `other` last; empty domains are
/// never present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainClassification {
    groups: Vec<(String, Vec<String>)>,
}

impl DomainClassification {
    /// Entity names for a domain key
    pub fn get(&self, domain: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, entities)| entities.as_slice())
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, entities)| (name.as_str(), entities.as_slice()))
    }

    /// Entity count per domain
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.groups
            .iter()
            .map(|(name, entities)| (name.clone(), entities.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group_mut(&mut self, key: String) -> &mut Vec<String> {
        let position = match self.groups.iter().position(|(name, _)| *name == key) {
            Some(position) => position,
            None => {
                self.groups.push((key, Vec::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[position].1
    }
}

impl Serialize for DomainClassification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.groups.iter().map(|(name, entities)| (name, entities)))
    }
}

/// Classifies entity graphs against a taxonomy registry
pub struct DomainClassifier<'a> {
    registry: &'a TaxonomyRegistry,
}

impl<'a> DomainClassifier<'a> {
    pub fn new(registry: &'a TaxonomyRegistry) -> Self {
        Self { registry }
    }

    /// Group the entities of `graph` by the domains of `version`
    ///
    /// Fails only when `version` is not registered; the error lists the
    /// versions that are.
    pub fn classify(&self, graph: &EntityGraph, version: &str) -> SchemaResult<DomainClassification> {
        let classify_span = span!(Level::INFO, "classify_domains", version);
        let _enter = classify_span.enter();

        let records = self.registry.lookup(version)?;
        let mut classification = DomainClassification::default();
        let mut placed: HashSet<&str> = HashSet::new();

        for record in records {
            let group = classification.group_mut(record.name.to_lowercase());
            for member in record.members() {
                if !graph.contains(member) {
                    continue;
                }
                if !group.iter().any(|existing| existing == member) {
                    group.push(member.to_string());
                }
                placed.insert(member);
            }
        }

        let unplaced: Vec<String> = graph
            .entity_names()
            .filter(|name| !placed.contains(name))
            .map(str::to_string)
            .collect();
        debug!(unplaced = unplaced.len(), "Entities outside the taxonomy");
        classification
            .group_mut(OTHER_DOMAIN.to_string())
            .extend(unplaced);

        classification.groups.retain(|(_, entities)| !entities.is_empty());

        info!(domains = classification.len(), "Classification completed");
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Entity;
    use crate::domains::DomainRecord;

    fn graph(names: &[&str]) -> EntityGraph {
        let mut graph = EntityGraph::new();
        for name in names {
            graph.add_entity(Entity::new(*name));
        }
        graph
    }

    fn registry() -> TaxonomyRegistry {
        let mut registry = TaxonomyRegistry::new();
        registry.insert(
            "1.0",
            vec![
                DomainRecord::new("Enrollment")
                    .with_entities(["Student", "School", "Missing"])
                    .with_associations(["StudentSchoolAssociation", "Student"]),
                DomainRecord::new("Staff").with_entities(["Staff", "School"]),
                DomainRecord::new("Empty").with_entities(["Nobody"]),
            ],
        );
        registry
    }

    #[test]
    fn test_groups_follow_taxonomy_order() {
        let registry = registry();
        let graph = graph(&["Student", "School", "StudentSchoolAssociation", "Staff"]);
        let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();

        let domains: Vec<_> = result.domains().collect();
        assert_eq!(domains, vec!["enrollment", "staff"]);
        assert_eq!(
            result.get("enrollment").unwrap(),
            &["Student", "School", "StudentSchoolAssociation"]
        );
    }

    #[test]
    fn test_entity_may_appear_in_several_domains() {
        let registry = registry();
        let graph = graph(&["School", "Staff"]);
        let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();
        assert!(result.get("enrollment").unwrap().contains(&"School".to_string()));
        assert!(result.get("staff").unwrap().contains(&"School".to_string()));
    }

    #[test]
    fn test_unplaced_entities_go_to_other() {
        let registry = registry();
        let graph = graph(&["Student", "Ghost", "Phantom"]);
        let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();
        let domains: Vec<_> = result.domains().collect();
        assert_eq!(domains, vec!["enrollment", "other"]);
        assert_eq!(result.get("other").unwrap(), &["Ghost", "Phantom"]);
    }

    #[test]
    fn test_empty_domains_are_dropped() {
        let registry = registry();
        let result = DomainClassifier::new(&registry)
            .classify(&EntityGraph::new(), "1.0")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_version() {
        let registry = registry();
        let err = DomainClassifier::new(&registry)
            .classify(&graph(&["Student"]), "bogus")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bogus"));
        assert!(message.contains("1.0"));
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let registry = registry();
        let graph = graph(&["Staff", "Student"]);
        let result = DomainClassifier::new(&registry).classify(&graph, "1.0").unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"enrollment":["Student"],"staff":["Staff"]}"#);
        assert_eq!(result.counts().get("staff"), Some(&1));
    }
}
