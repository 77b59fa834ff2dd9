//! Core type definitions shared by the analyzer and the diagram plugins
//!
//! This module contains relationship cardinality (with its single notation
//! table), the supported diagram grammars, and the rendering options record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SchemaError;

/// Relationship multiplicity between two entities
///
/// Extraction only ever produces [`Cardinality::OneToOne`] and
/// [`Cardinality::OneToMany`]; the remaining variants are rendered but never
/// inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// How a cardinality is drawn in each grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardinalityNotation {
    /// Crow's-foot connector shared by the ER and UML grammars
    pub symbol: &'static str,
    /// Graphviz `arrowhead` value
    pub arrowhead: &'static str,
    /// Graphviz `arrowtail` value; only drawn under `dir=both`
    pub arrowtail: &'static str,
}

const NOTATIONS: [(Cardinality, CardinalityNotation); 4] = [
    (
        Cardinality::OneToOne,
        CardinalityNotation {
            symbol: "||--||",
            arrowhead: "none",
            arrowtail: "none",
        },
    ),
    (
        Cardinality::OneToMany,
        CardinalityNotation {
            symbol: "||--o{",
            arrowhead: "crow",
            arrowtail: "none",
        },
    ),
    (
        Cardinality::ManyToOne,
        CardinalityNotation {
            symbol: "}o--||",
            arrowhead: "none",
            arrowtail: "crow",
        },
    ),
    (
        Cardinality::ManyToMany,
        CardinalityNotation {
            symbol: "}o--o{",
            arrowhead: "crow",
            arrowtail: "crow",
        },
    ),
];

impl Cardinality {
    /// All cardinalities in table order
    pub const ALL: [Cardinality; 4] = [
        Cardinality::OneToOne,
        Cardinality::OneToMany,
        Cardinality::ManyToOne,
        Cardinality::ManyToMany,
    ];

    /// Look up the notation for this cardinality
    pub fn notation(self) -> &'static CardinalityNotation {
        let index = match self {
            Cardinality::OneToOne => 0,
            Cardinality::OneToMany => 1,
            Cardinality::ManyToOne => 2,
            Cardinality::ManyToMany => 3,
        };
        &NOTATIONS[index].1
    }

    /// Crow's-foot connector for the ER and UML grammars
    pub fn symbol(self) -> &'static str {
        self.notation().symbol
    }

    /// Graphviz edge attributes (without the label)
    pub fn graph_style(self) -> String {
        let notation = self.notation();
        let mut style = format!(
            "arrowhead={}, arrowtail={}",
            notation.arrowhead, notation.arrowtail
        );
        if notation.arrowtail != "none" {
            style.push_str(", dir=both");
        }
        style
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one-to-one",
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToOne => "many-to-one",
            Cardinality::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cardinality::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown relationship type: {}", s))
    }
}

/// Textual diagram grammars the renderer can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    /// Mermaid `erDiagram`
    Mermaid,
    /// PlantUML entity diagram
    PlantUml,
    /// Graphviz DOT digraph
    Graphviz,
}

impl DiagramFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["mermaid", "plantuml", "graphviz"]
    }

    /// Conventional file extension for the diagram source
    pub fn extension(&self) -> &'static str {
        match self {
            DiagramFormat::Mermaid => "mmd",
            DiagramFormat::PlantUml => "puml",
            DiagramFormat::Graphviz => "dot",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramFormat::Mermaid => write!(f, "mermaid"),
            DiagramFormat::PlantUml => write!(f, "plantuml"),
            DiagramFormat::Graphviz => write!(f, "graphviz"),
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mermaid" => Ok(DiagramFormat::Mermaid),
            "plantuml" => Ok(DiagramFormat::PlantUml),
            "graphviz" | "dot" => Ok(DiagramFormat::Graphviz),
            _ => Err(SchemaError::unsupported_format(s)),
        }
    }
}

/// Default cap on rendered entities
pub const DEFAULT_MAX_ENTITIES: usize = 20;

/// Options controlling entity selection and diagram output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: DiagramFormat,
    pub include_properties: bool,
    /// Reserved; no grammar renders descriptions yet
    pub include_descriptions: bool,
    /// Case-insensitive substrings matched against entity names
    pub filter_domains: Vec<String>,
    pub max_entities: usize,
}

impl RenderOptions {
    pub fn new(format: DiagramFormat) -> Self {
        Self {
            format,
            include_properties: true,
            include_descriptions: false,
            filter_domains: Vec::new(),
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }

    pub fn with_properties(mut self, include: bool) -> Self {
        self.include_properties = include;
        self
    }

    pub fn with_descriptions(mut self, include: bool) -> Self {
        self.include_descriptions = include;
        self
    }

    pub fn with_filter_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = max;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(DiagramFormat::Mermaid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_symbols() {
        assert_eq!(Cardinality::OneToOne.symbol(), "||--||");
        assert_eq!(Cardinality::OneToMany.symbol(), "||--o{");
        assert_eq!(Cardinality::ManyToOne.symbol(), "}o--||");
        assert_eq!(Cardinality::ManyToMany.symbol(), "}o--o{");
    }

    #[test]
    fn test_cardinality_graph_styles() {
        assert_eq!(
            Cardinality::OneToOne.graph_style(),
            "arrowhead=none, arrowtail=none"
        );
        assert_eq!(
            Cardinality::OneToMany.graph_style(),
            "arrowhead=crow, arrowtail=none"
        );
        assert_eq!(
            Cardinality::ManyToOne.graph_style(),
            "arrowhead=none, arrowtail=crow, dir=both"
        );
        assert_eq!(
            Cardinality::ManyToMany.graph_style(),
            "arrowhead=crow, arrowtail=crow, dir=both"
        );
    }

    #[test]
    fn test_notation_table_matches_each_cardinality() {
        for cardinality in Cardinality::ALL {
            let row = NOTATIONS
                .iter()
                .find(|(c, _)| *c == cardinality)
                .map(|(_, n)| n);
            assert_eq!(row, Some(cardinality.notation()), "{}", cardinality);
        }
    }

    #[test]
    fn test_cardinality_parsing() {
        assert_eq!(
            "one-to-many".parse::<Cardinality>().unwrap(),
            Cardinality::OneToMany
        );
        assert_eq!(
            "Many-To-Many".parse::<Cardinality>().unwrap(),
            Cardinality::ManyToMany
        );
        assert!("several".parse::<Cardinality>().is_err());
    }

    #[test]
    fn test_cardinality_serializes_kebab_case() {
        let json = serde_json::to_string(&Cardinality::OneToMany).unwrap();
        assert_eq!(json, "\"one-to-many\"");
    }

    #[test]
    fn test_diagram_format_parsing() {
        assert_eq!(
            "mermaid".parse::<DiagramFormat>().unwrap(),
            DiagramFormat::Mermaid
        );
        assert_eq!(
            "PlantUML".parse::<DiagramFormat>().unwrap(),
            DiagramFormat::PlantUml
        );
        assert_eq!(
            "dot".parse::<DiagramFormat>().unwrap(),
            DiagramFormat::Graphviz
        );
        let err = "svg".parse::<DiagramFormat>().unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFormat { ref format } if format == "svg"));
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::new(DiagramFormat::Graphviz);
        assert!(options.include_properties);
        assert!(!options.include_descriptions);
        assert!(options.filter_domains.is_empty());
        assert_eq!(options.max_entities, 20);
    }
}
