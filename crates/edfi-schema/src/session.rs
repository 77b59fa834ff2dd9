//! Loaded-document state shared by the command-line and tool-server hosts

use serde_json::Value;
use tracing::info;

use crate::analyzer::{Entity, EntityGraph, Relationship, SchemaAnalyzer};
use crate::config::SourceConfig;
use crate::core::{Cardinality, RenderOptions, SchemaError, SchemaResult};
use crate::domains::{DomainClassification, DomainClassifier, TaxonomyRegistry};
use crate::openapi::{self, DocumentInfo, Endpoint};
use crate::plugins::Orchestrator;
use crate::source::{SpecCache, SpecSource};
use crate::stats::GraphStatistics;

/// A document together with its analysis
struct Loaded {
    source: Option<SpecSource>,
    document: Value,
    graph: EntityGraph,
}

/// Owns at most one loaded specification and answers queries about it
pub struct Session {
    loaded: Option<Loaded>,
    registry: TaxonomyRegistry,
    default_version: String,
    cache: SpecCache,
    analyzer: SchemaAnalyzer,
    orchestrator: Orchestrator,
}

impl Session {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            loaded: None,
            registry: TaxonomyRegistry::builtin(),
            default_version: config.data_standard_version.clone(),
            cache: SpecCache::from_config(config),
            analyzer: SchemaAnalyzer::new(),
            orchestrator: Orchestrator::with_all_plugins(),
        }
    }

    /// Replace the built-in taxonomy
    pub fn with_registry(mut self, registry: TaxonomyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &TaxonomyRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &SpecCache {
        &self.cache
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn source(&self) -> Option<&SpecSource> {
        self.loaded.as_ref().and_then(|l| l.source.as_ref())
    }

    /// Load a document and analyze it
    ///
    /// On failure the previously loaded document stays in place.
    pub fn load(&mut self, source: &SpecSource) -> SchemaResult<&EntityGraph> {
        let document = source.load(&self.cache)?;
        Ok(self.install(Some(source.clone()), document))
    }

    /// Adopt an already parsed document
    pub fn load_document(&mut self, document: Value) -> &EntityGraph {
        self.install(None, document)
    }

    pub fn document(&self) -> SchemaResult<&Value> {
        self.current().map(|l| &l.document)
    }

    pub fn graph(&self) -> SchemaResult<&EntityGraph> {
        self.current().map(|l| &l.graph)
    }

    pub fn info(&self) -> SchemaResult<DocumentInfo> {
        Ok(openapi::document_info(self.document()?))
    }

    pub fn statistics(&self, version: Option<&str>) -> SchemaResult<GraphStatistics> {
        let classification = self.classify(version)?;
        Ok(GraphStatistics::from_graph(self.graph()?, Some(&classification)))
    }

    /// Group entities by domain, using the session default when `version` is `None`
    pub fn classify(&self, version: Option<&str>) -> SchemaResult<DomainClassification> {
        let graph = self.graph()?;
        let version = version.unwrap_or(&self.default_version);
        DomainClassifier::new(&self.registry).classify(graph, version)
    }

    pub fn render(&self, options: &RenderOptions) -> SchemaResult<String> {
        self.orchestrator.render(self.graph()?, options)
    }

    pub fn entity(&self, name: &str) -> SchemaResult<&Entity> {
        self.graph()?
            .entity(name)
            .ok_or_else(|| SchemaError::entity_not_found(name))
    }

    pub fn search(&self, query: &str) -> SchemaResult<Vec<&Entity>> {
        Ok(self.graph()?.search(query))
    }

    pub fn endpoints(&self, filter: Option<&str>) -> SchemaResult<Vec<Endpoint>> {
        Ok(openapi::list_endpoints(self.document()?, filter))
    }

    /// Relationships touching `entity` (either end), optionally of one cardinality
    pub fn relationships(
        &self,
        entity: Option<&str>,
        cardinality: Option<Cardinality>,
    ) -> SchemaResult<Vec<&Relationship>> {
        let graph = self.graph()?;
        if let Some(name) = entity {
            if !graph.contains(name) {
                return Err(SchemaError::entity_not_found(name));
            }
        }
        let candidates: Vec<&Relationship> = match cardinality {
            Some(c) => graph.relationships_of_type(c).collect(),
            None => graph.relationships().iter().collect(),
        };
        Ok(candidates
            .into_iter()
            .filter(|r| entity.map_or(true, |name| r.touches(name)))
            .collect())
    }

    fn install(&mut self, source: Option<SpecSource>, document: Value) -> &EntityGraph {
        let graph = self.analyzer.analyze(&document);
        info!(
            entities = graph.entity_count(),
            relationships = graph.relationship_count(),
            "Specification loaded"
        );
        let loaded = self.loaded.insert(Loaded {
            source,
            document,
            graph,
        });
        &loaded.graph
    }

    fn current(&self) -> SchemaResult<&Loaded> {
        self.loaded.as_ref().ok_or(SchemaError::NoDocument)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SourceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiagramFormat;
    use crate::domains::DomainRecord;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Test API", "version": "1" },
            "paths": { "/students": { "get": { "tags": ["students"] } } },
            "components": { "schemas": {
                "Student": { "properties": {
                    "schoolReference": { "$ref": "#/components/schemas/School" },
                    "addresses": { "type": "array", "items": { "$ref": "#/components/schemas/Address" } }
                }},
                "School": {},
                "Address": {}
            }}
        })
    }

    fn session() -> Session {
        let mut registry = TaxonomyRegistry::new();
        registry.insert("1.0", vec![DomainRecord::new("Core").with_entities(["Student", "School"])]);
        let config = SourceConfig {
            data_standard_version: "1.0".to_string(),
            ..SourceConfig::default()
        };
        Session::new(&config).with_registry(registry)
    }

    #[test]
    fn test_queries_require_document() {
        let session = session();
        assert!(!session.is_loaded());
        assert!(matches!(session.graph(), Err(SchemaError::NoDocument)));
        assert!(matches!(session.statistics(None), Err(SchemaError::NoDocument)));
        assert!(matches!(
            session.render(&RenderOptions::default()),
            Err(SchemaError::NoDocument)
        ));
    }

    #[test]
    fn test_load_document_and_query() {
        let mut session = session();
        assert_eq!(session.load_document(document()).entity_count(), 3);

        let stats = session.statistics(None).unwrap();
        assert_eq!(stats.relationship_count, 2);
        assert_eq!(stats.domains.get("core"), Some(&2));
        assert_eq!(stats.domains.get("other"), Some(&1));

        assert_eq!(session.entity("School").unwrap().name, "School");
        assert!(matches!(
            session.entity("Nope"),
            Err(SchemaError::EntityNotFound { .. })
        ));
        assert_eq!(session.search("add").unwrap().len(), 1);
        assert_eq!(session.endpoints(Some("stud")).unwrap().len(), 1);
        assert_eq!(session.info().unwrap().title.as_deref(), Some("Test API"));
    }

    #[test]
    fn test_relationship_filters() {
        let mut session = session();
        session.load_document(document());
        assert_eq!(session.relationships(None, None).unwrap().len(), 2);
        assert_eq!(session.relationships(Some("School"), None).unwrap().len(), 1);
        assert_eq!(
            session
                .relationships(None, Some(Cardinality::OneToMany))
                .unwrap()
                .len(),
            1
        );
        assert!(session
            .relationships(Some("School"), Some(Cardinality::ManyToMany))
            .unwrap()
            .is_empty());
        assert!(session.relationships(Some("Ghost"), None).is_err());
    }

    #[test]
    fn test_reload_replaces_graph() {
        let mut session = session();
        session.load_document(document());
        session.load_document(json!({ "components": { "schemas": { "Only": {} } } }));
        let graph = session.graph().unwrap();
        assert_eq!(graph.entity_count(), 1);
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_failed_load_keeps_previous_document() {
        let mut session = session();
        session.load_document(document());
        let missing = SpecSource::File("/no/such/spec.json".into());
        assert!(session.load(&missing).is_err());
        assert_eq!(session.graph().unwrap().entity_count(), 3);
    }

    #[test]
    fn test_render_and_unknown_version() {
        let mut session = session();
        session.load_document(document());
        let diagram = session
            .render(&RenderOptions::new(DiagramFormat::Mermaid))
            .unwrap();
        assert!(diagram.starts_with("erDiagram"));
        assert!(matches!(
            session.classify(Some("9.9")),
            Err(SchemaError::UnsupportedVersion { .. })
        ));
    }
}
