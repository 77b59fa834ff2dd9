//! Core renderer trait for diagram output
//!
//! Each grammar plugin turns a [`GraphView`] into diagram source text.
//! Rendering is a pure function of the view; selection has already happened.

use super::{DiagramFormat, GraphView};

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use edfi_schema::core::{GraphView, RenderOptions, Renderer};
/// use edfi_schema::analyzer::EntityGraph;
/// use edfi_schema::plugins::MermaidRenderer;
///
/// let graph = EntityGraph::new();
/// let options = RenderOptions::default();
/// let view = GraphView::select(&graph, &options);
/// let output = MermaidRenderer::new().render(&view);
/// assert!(output.starts_with("erDiagram"));
/// ```
pub trait Renderer: Send + Sync {
    /// Render the selected entities and relationships
    fn render(&self, view: &GraphView<'_>) -> String;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the grammar this renderer emits
    fn format(&self) -> DiagramFormat;
}
