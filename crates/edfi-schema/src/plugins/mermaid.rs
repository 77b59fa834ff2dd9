//! Mermaid `erDiagram` renderer

use std::fmt::Write;
use tracing::{debug, span, Level};

use crate::analyzer::Entity;
use crate::core::{DiagramFormat, GraphView, Renderer};

/// Properties drawn per entity block
pub const MERMAID_PROPERTY_LIMIT: usize = 10;

/// Renders entity graphs as Mermaid ER diagrams
///
/// Entity and attribute names are sanitized into bare identifiers;
/// reference properties show only their type tag.
#[derive(Debug, Clone)]
pub struct MermaidRenderer {
    include_properties: bool,
}

impl MermaidRenderer {
    pub fn new() -> Self {
        Self {
            include_properties: true,
        }
    }

    pub fn with_properties(include_properties: bool) -> Self {
        Self { include_properties }
    }

    fn write_entity(&self, out: &mut String, entity: &Entity) {
        let _ = writeln!(out, "    {} {{", sanitize_identifier(&entity.name));
        if self.include_properties {
            for prop in entity.properties.iter().take(MERMAID_PROPERTY_LIMIT) {
                let marker = if prop.required { "*" } else { "" };
                let _ = writeln!(
                    out,
                    "        {} {}{}",
                    sanitize_identifier(&prop.property_type),
                    sanitize_identifier(&prop.name),
                    marker
                );
            }
        }
        out.push_str("    }\n");
    }
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MermaidRenderer {
    fn render(&self, view: &GraphView<'_>) -> String {
        let render_span = span!(Level::DEBUG, "render_mermaid", entities = view.entities.len());
        let _enter = render_span.enter();

        let mut out = String::from("erDiagram\n");
        for entity in &view.entities {
            self.write_entity(&mut out, entity);
        }

        if !view.relationships.is_empty() {
            out.push('\n');
        }
        for rel in &view.relationships {
            let _ = writeln!(
                out,
                "    {} {} {} : \"{}\"",
                sanitize_identifier(&rel.from_entity),
                rel.cardinality.symbol(),
                sanitize_identifier(&rel.to_entity),
                escape_label(&rel.property)
            );
        }

        debug!(output_len = out.len(), "Mermaid rendering completed");
        out
    }

    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn format(&self) -> DiagramFormat {
        DiagramFormat::Mermaid
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Encode `"` for a quoted relationship label
pub fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
}
