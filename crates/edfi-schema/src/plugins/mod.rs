//! Diagram grammar plugins
//!
//! Each plugin implements [`crate::core::Renderer`] for one textual grammar.
//! The [`Orchestrator`] selects entities once and dispatches to the plugin
//! registered for the requested format.

pub mod graphviz;
pub mod mermaid;
pub mod orchestrator;
pub mod plantuml;

pub use graphviz::GraphvizRenderer;
pub use mermaid::{sanitize_identifier, MermaidRenderer};
pub use orchestrator::Orchestrator;
pub use plantuml::PlantUmlRenderer;
