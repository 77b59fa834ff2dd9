//! PlantUML entity diagram renderer

use std::fmt::Write;
use tracing::{debug, span, Level};

use crate::analyzer::{Entity, Property};
use crate::core::{DiagramFormat, GraphView, Renderer};

/// Properties drawn per entity block
pub const PLANTUML_PROPERTY_LIMIT: usize = 10;

const HEADER: &str = "@startuml\n!theme plain\nhide circle\nskinparam linetype ortho\n";
const FOOTER: &str = "@enduml\n";

/// Renders entity graphs as PlantUML entity diagrams
///
/// Names are quoted rather than sanitized. Reference properties show the
/// target entity in place of their type.
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    include_properties: bool,
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self {
            include_properties: true,
        }
    }

    pub fn with_properties(include_properties: bool) -> Self {
        Self { include_properties }
    }

    fn write_entity(&self, out: &mut String, entity: &Entity) {
        let _ = writeln!(out, "entity \"{}\" {{", quote_safe(&entity.name));
        if self.include_properties {
            for prop in entity.properties.iter().take(PLANTUML_PROPERTY_LIMIT) {
                let marker = if prop.required { "*" } else { "" };
                let _ = writeln!(out, "  {}{} : {}", marker, prop.name, display_type(prop));
            }
        }
        out.push_str("}\n\n");
    }
}

fn display_type(prop: &Property) -> String {
    match &prop.reference {
        Some(target) => format!("→{}", target),
        None => prop.property_type.clone(),
    }
}

/// PlantUML has no escape inside quoted names, so `"` becomes `'`
fn quote_safe(name: &str) -> String {
    name.replace('"', "'")
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlantUmlRenderer {
    fn render(&self, view: &GraphView<'_>) -> String {
        let render_span = span!(Level::DEBUG, "render_plantuml", entities = view.entities.len());
        let _enter = render_span.enter();

        let mut out = String::from(HEADER);
        out.push('\n');
        for entity in &view.entities {
            self.write_entity(&mut out, entity);
        }
        for rel in &view.relationships {
            let _ = writeln!(
                out,
                "\"{}\" {} \"{}\" : {}",
                quote_safe(&rel.from_entity),
                rel.cardinality.symbol(),
                quote_safe(&rel.to_entity),
                rel.property
            );
        }
        out.push_str(FOOTER);

        debug!(output_len = out.len(), "PlantUML rendering completed");
        out
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn format(&self) -> DiagramFormat {
        DiagramFormat::PlantUml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{EntityGraph, Relationship};
    use crate::core::{Cardinality, RenderOptions};

    #[test]
    fn test_render_wrapper_and_blocks() {
        let mut graph = EntityGraph::new();
        let mut student = Entity::new("Student");
        student.add_property(Property::new("firstName", "string").with_required(true));
        student.add_property(
            Property::new("schoolReference", "reference").with_reference("School"),
        );
        graph.add_entity(student);
        graph.add_entity(Entity::new("School"));
        graph.add_relationship(Relationship::new(
            "Student",
            "School",
            Cardinality::OneToOne,
            "schoolReference",
        ));

        let view = GraphView::select(&graph, &RenderOptions::default());
        let output = PlantUmlRenderer::new().render(&view);

        assert!(output.starts_with("@startuml\n"));
        assert!(output.ends_with("@enduml\n"));
        assert!(output.contains("entity \"Student\" {\n"));
        assert!(output.contains("  *firstName : string\n"));
        assert!(output.contains("  schoolReference : →School\n"));
        assert!(output.contains("\"Student\" ||--|| \"School\" : schoolReference\n"));
    }

    #[test]
    fn test_names_are_not_sanitized() {
        let mut graph = EntityGraph::new();
        graph.add_entity(Entity::new("tpdm.candidate"));
        let view = GraphView::select(&graph, &RenderOptions::default());
        let output = PlantUmlRenderer::new().render(&view);
        assert!(output.contains("entity \"tpdm.candidate\" {"));
    }

    #[test]
    fn test_quote_in_names_stays_valid() {
        let mut graph = EntityGraph::new();
        graph.add_entity(Entity::new("A\"x"));
        graph.add_entity(Entity::new("B"));
        graph.add_relationship(Relationship::new("A\"x", "B", Cardinality::OneToMany, "items"));

        let view = GraphView::select(&graph, &RenderOptions::default());
        let output = PlantUmlRenderer::new().render(&view);
        assert!(output.contains("entity \"A'x\" {\n"));
        assert!(output.contains("\"A'x\" ||--o{ \"B\" : items\n"));
        assert!(!output.contains("A\"x"));
    }
}
