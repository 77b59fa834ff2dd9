//! Graphviz DOT renderer
//!
//! Each entity is one `record` node whose label lists the entity name
//! followed by its properties, separated by `|`.

use std::fmt::Write;
use tracing::{debug, span, Level};

use crate::analyzer::Entity;
use crate::core::{DiagramFormat, GraphView, Renderer};

/// Properties drawn per record node
pub const GRAPHVIZ_PROPERTY_LIMIT: usize = 8;

/// Graph identifier used in the `digraph` header
pub const GRAPH_NAME: &str = "EdFiDataModel";

/// Renders entity graphs as Graphviz directed graphs
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    include_properties: bool,
}

impl GraphvizRenderer {
    pub fn new() -> Self {
        Self {
            include_properties: true,
        }
    }

    pub fn with_properties(include_properties: bool) -> Self {
        Self { include_properties }
    }

    fn record_label(&self, entity: &Entity) -> String {
        let mut fields = vec![escape_record(&entity.name)];
        if self.include_properties {
            fields.extend(
                entity
                    .properties
                    .iter()
                    .take(GRAPHVIZ_PROPERTY_LIMIT)
                    .map(|prop| {
                        let marker = if prop.required { "*" } else { "" };
                        escape_record(&format!("{}{}: {}", marker, prop.name, prop.property_type))
                    }),
            );
        }
        format!("{{{}}}", fields.join("|"))
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, view: &GraphView<'_>) -> String {
        let render_span = span!(Level::DEBUG, "render_graphviz", entities = view.entities.len());
        let _enter = render_span.enter();

        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", GRAPH_NAME);
        out.push_str("  rankdir=TB;\n");
        out.push_str("  node [shape=record, style=filled, fillcolor=lightblue, fontname=\"Helvetica\"];\n");
        out.push_str("  edge [fontname=\"Helvetica\", fontsize=10];\n\n");

        for entity in &view.entities {
            let _ = writeln!(
                out,
                "  \"{}\" [label=\"{}\"];",
                escape_id(&entity.name),
                self.record_label(entity)
            );
        }

        if !view.relationships.is_empty() {
            out.push('\n');
        }
        for rel in &view.relationships {
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{}\", {}];",
                escape_id(&rel.from_entity),
                escape_id(&rel.to_entity),
                escape_id(&rel.property),
                rel.cardinality.graph_style()
            );
        }
        out.push_str("}\n");

        debug!(output_len = out.len(), "Graphviz rendering completed");
        out
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn format(&self) -> DiagramFormat {
        DiagramFormat::Graphviz
    }
}

/// Escape text for a quoted DOT identifier
pub fn escape_id(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text for a field inside a record label
pub fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{EntityGraph, Property, Relationship};
    use crate::core::{Cardinality, RenderOptions};

    #[test]
    fn test_escape_record() {
        assert_eq!(escape_record("a|b"), "a\\|b");
        assert_eq!(escape_record("{x}"), "\\{x\\}");
        assert_eq!(escape_record("<port>"), "\\<port\\>");
        assert_eq!(escape_record("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_render_record_and_edge() {
        let mut graph = EntityGraph::new();
        let mut student = Entity::new("Student");
        student.add_property(Property::new("firstName", "string").with_required(true));
        student.add_property(Property::new("schools", "array").with_reference("School"));
        graph.add_entity(student);
        graph.add_entity(Entity::new("School"));
        graph.add_relationship(Relationship::new(
            "Student",
            "School",
            Cardinality::OneToMany,
            "schools",
        ));

        let view = GraphView::select(&graph, &RenderOptions::default());
        let output = GraphvizRenderer::new().render(&view);

        assert!(output.starts_with("digraph EdFiDataModel {\n  rankdir=TB;\n"));
        assert!(output.contains(
            "  \"Student\" [label=\"{Student|*firstName: string|schools: array}\"];"
        ));
        assert!(output.contains("  \"School\" [label=\"{School}\"];"));
        assert!(output.contains(
            "  \"Student\" -> \"School\" [label=\"schools\", arrowhead=crow, arrowtail=none];"
        ));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_property_cap_is_eight() {
        let mut graph = EntityGraph::new();
        let mut wide = Entity::new("Wide");
        for i in 0..12 {
            wide.add_property(Property::new(format!("f{}", i), "string"));
        }
        graph.add_entity(wide);
        let view = GraphView::select(&graph, &RenderOptions::default());
        let output = GraphvizRenderer::new().render(&view);
        assert!(output.contains("|f7: string}"));
        assert!(!output.contains("f8:"));
    }
}
