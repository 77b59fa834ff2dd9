//! Plugin orchestrator for diagram generation
//!
//! Routes a rendering request through the shared pipeline:
//! selection → grammar plugin → diagram source.

use std::collections::HashMap;
use tracing::{debug, info, span, warn, Level};

use super::{GraphvizRenderer, MermaidRenderer, PlantUmlRenderer};
use crate::analyzer::EntityGraph;
use crate::core::{DiagramFormat, GraphView, RenderOptions, Renderer, SchemaError, SchemaResult};

type RendererFactory = fn(bool) -> Box<dyn Renderer>;

/// Registry of grammar plugins keyed by diagram format
pub struct Orchestrator {
    factories: HashMap<DiagramFormat, RendererFactory>,
}

impl Orchestrator {
    /// Create a new empty orchestrator
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create an orchestrator with the Mermaid, PlantUML and Graphviz plugins
    pub fn with_all_plugins() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register(DiagramFormat::Mermaid, |props| -> Box<dyn Renderer> {
            Box::new(MermaidRenderer::with_properties(props))
        });
        orchestrator.register(DiagramFormat::PlantUml, |props| -> Box<dyn Renderer> {
            Box::new(PlantUmlRenderer::with_properties(props))
        });
        orchestrator.register(DiagramFormat::Graphviz, |props| -> Box<dyn Renderer> {
            Box::new(GraphvizRenderer::with_properties(props))
        });
        orchestrator
    }

    /// Register a renderer factory for a format, replacing any previous one
    pub fn register(&mut self, format: DiagramFormat, factory: RendererFactory) {
        self.factories.insert(format, factory);
    }

    /// Formats with a registered renderer
    pub fn formats(&self) -> Vec<DiagramFormat> {
        let mut formats: Vec<_> = self.factories.keys().copied().collect();
        formats.sort_by_key(|f| f.to_string());
        formats
    }

    /// Render `graph` in the format named by `options`
    pub fn render(&self, graph: &EntityGraph, options: &RenderOptions) -> SchemaResult<String> {
        let render_span = span!(Level::INFO, "render_diagram", format = %options.format);
        let _enter = render_span.enter();

        let factory = self.factories.get(&options.format).ok_or_else(|| {
            warn!(format = %options.format, registered = ?self.formats(), "No renderer registered");
            SchemaError::unsupported_format(options.format.to_string())
        })?;

        let view = GraphView::select(graph, options);
        debug!(
            entities = view.entities.len(),
            relationships = view.relationships.len(),
            "Selected entities"
        );

        let renderer = factory(options.include_properties);
        let output = renderer.render(&view);
        info!(renderer = renderer.name(), output_len = output.len(), "Diagram rendered");
        Ok(output)
    }

    /// Render using a format name, failing on unknown grammars
    pub fn render_named(
        &self,
        graph: &EntityGraph,
        format: &str,
        options: &RenderOptions,
    ) -> SchemaResult<String> {
        let format: DiagramFormat = format.parse()?;
        let options = RenderOptions {
            format,
            ..options.clone()
        };
        self.render(graph, &options)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::with_all_plugins()
    }
}
