//! Entity selection shared by every diagram grammar
//!
//! Selection runs before rendering: name-substring filtering, then
//! truncation to `max_entities`, then keeping only relationships whose
//! endpoints were both selected.

use std::collections::HashSet;
use tracing::{debug, span, Level};

use super::RenderOptions;
use crate::analyzer::{Entity, EntityGraph, Relationship};

/// The slice of a graph that a diagram draws
#[derive(Debug, Clone, Default)]
pub struct GraphView<'a> {
    pub entities: Vec<&'a Entity>,
    pub relationships: Vec<&'a Relationship>,
}

impl<'a> GraphView<'a> {
    /// Select entities and relationships from `graph` according to `options`
    pub fn select(graph: &'a EntityGraph, options: &RenderOptions) -> Self {
        let select_span = span!(
            Level::DEBUG,
            "select_entities",
            total = graph.entity_count(),
            max = options.max_entities
        );
        let _enter = select_span.enter();

        let filters: Vec<String> = options
            .filter_domains
            .iter()
            .map(|f| f.to_lowercase())
            .collect();

        let entities: Vec<&Entity> = graph
            .entities()
            .iter()
            .filter(|entity| matches_any(&entity.name, &filters))
            .take(options.max_entities)
            .collect();

        let selected: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        let relationships: Vec<&Relationship> = graph
            .relationships()
            .iter()
            .filter(|r| {
                selected.contains(r.from_entity.as_str()) && selected.contains(r.to_entity.as_str())
            })
            .collect();

        debug!(
            entities = entities.len(),
            relationships = relationships.len(),
            "Selection completed"
        );

        Self {
            entities,
            relationships,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Empty filter list matches everything
fn matches_any(name: &str, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let name = name.to_lowercase();
    filters.iter().any(|f| name.contains(f.as_str()))
}
