//! Tools exposed over MCP.
//!
//! Available tools:
//! - `load_spec`: Load an OpenAPI document from a path or URL
//! - `get_statistics`: Entity, relationship and domain counts
//! - `list_entities`: Entity names with optional name filter
//! - `get_entity`: One entity with its properties and relationships
//! - `list_relationships`: Relationships by entity and cardinality
//! - `list_endpoints`: API operations by path or tag
//! - `classify_domains`: Entities grouped by Ed-Fi domain
//! - `generate_diagram`: Mermaid, PlantUML or Graphviz source

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, span, Level};

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, Tool};
use edfi_schema::source::SpecSource;
use edfi_schema::{Cardinality, DiagramFormat, RenderOptions, Session, DEFAULT_MAX_ENTITIES};

/// Parse JSON arguments into a typed structure.
pub fn parse_args<T: DeserializeOwned>(args: Option<Value>) -> McpResult<T> {
    let args = args.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(args).map_err(|e| McpError::InvalidArguments(e.to_string()))
}

fn object_schema(required: &[&str], properties: Value) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn string_arg(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn version_arg() -> Value {
    string_arg("Ed-Fi Data Standard version of the domain taxonomy (e.g. '5.2'); defaults to the server setting")
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "load_spec".to_string(),
            description: "Load an Ed-Fi OpenAPI specification from a file path or http(s) URL and analyze its entities and relationships. Replaces any previously loaded specification.".to_string(),
            input_schema: object_schema(
                &["source"],
                json!({ "source": string_arg("File path or URL of the OpenAPI document (JSON or YAML)") }),
            ),
        },
        Tool {
            name: "get_statistics".to_string(),
            description: "Count entities, relationships by cardinality, and entities per Ed-Fi domain.".to_string(),
            input_schema: object_schema(&[], json!({ "version": version_arg() })),
        },
        Tool {
            name: "list_entities".to_string(),
            description: "List entity (schema) names with their property counts.".to_string(),
            input_schema: object_schema(
                &[],
                json!({ "filter": string_arg("Case-insensitive substring of the entity name") }),
            ),
        },
        Tool {
            name: "get_entity".to_string(),
            description: "Show one entity: its properties, the entities it references, and the entities that reference it.".to_string(),
            input_schema: object_schema(&["name"], json!({ "name": string_arg("Exact entity name") })),
        },
        Tool {
            name: "list_relationships".to_string(),
            description: "List relationships, optionally restricted to one entity or one cardinality.".to_string(),
            input_schema: object_schema(
                &[],
                json!({
                    "entity": string_arg("Only relationships starting or ending at this entity"),
                    "type": {
                        "type": "string",
                        "enum": Cardinality::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                        "description": "Only relationships of this cardinality"
                    }
                }),
            ),
        },
        Tool {
            name: "list_endpoints".to_string(),
            description: "List API operations with method, path, summary and tags.".to_string(),
            input_schema: object_schema(
                &[],
                json!({ "filter": string_arg("Case-insensitive substring of the path or a tag") }),
            ),
        },
        Tool {
            name: "classify_domains".to_string(),
            description: "Group entities by Ed-Fi subject-area domain. Entities outside the taxonomy are listed under 'other'.".to_string(),
            input_schema: object_schema(&[], json!({ "version": version_arg() })),
        },
        Tool {
            name: "generate_diagram".to_string(),
            description: "Render an entity-relationship diagram as Mermaid, PlantUML or Graphviz source.".to_string(),
            input_schema: object_schema(
                &["format"],
                json!({
                    "format": {
                        "type": "string",
                        "enum": DiagramFormat::variants(),
                        "description": "Diagram grammar"
                    },
                    "includeProperties": { "type": "boolean", "default": true, "description": "Draw entity properties" },
                    "includeDescriptions": { "type": "boolean", "default": false, "description": "Reserved; no grammar draws descriptions yet" },
                    "filterDomains": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Keep entities whose name contains any of these substrings"
                    },
                    "maxEntities": { "type": "integer", "minimum": 0, "default": DEFAULT_MAX_ENTITIES, "description": "Maximum entities drawn" }
                }),
            ),
        },
    ]
}

#[derive(Deserialize)]
struct LoadSpecArgs {
    source: String,
}

#[derive(Deserialize)]
struct VersionArgs {
    version: Option<String>,
}

#[derive(Deserialize)]
struct FilterArgs {
    filter: Option<String>,
}

#[derive(Deserialize)]
struct EntityArgs {
    name: String,
}

#[derive(Deserialize)]
struct RelationshipArgs {
    entity: Option<String>,
    #[serde(rename = "type")]
    cardinality: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramArgs {
    format: String,
    include_properties: Option<bool>,
    include_descriptions: Option<bool>,
    #[serde(default)]
    filter_domains: Vec<String>,
    max_entities: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntitySummary<'a> {
    name: &'a str,
    property_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

fn json_result<T: Serialize>(value: &T) -> McpResult<CallToolResult> {
    Ok(CallToolResult::text(serde_json::to_string_pretty(value)?))
}

/// Execute a tool by name.
pub fn execute_tool(
    name: &str,
    arguments: Option<Value>,
    session: &mut Session,
) -> McpResult<CallToolResult> {
    let tool_span = span!(Level::INFO, "execute_tool", tool = name);
    let _enter = tool_span.enter();
    debug!(has_arguments = arguments.is_some(), "Executing tool");

    match name {
        "load_spec" => {
            let args: LoadSpecArgs = parse_args(arguments)?;
            let source: SpecSource = args.source.parse()?;
            let graph = session.load(&source)?;
            let (entities, relationships) = (graph.entity_count(), graph.relationship_count());
            json_result(&json!({
                "source": source.to_string(),
                "entities": entities,
                "relationships": relationships,
                "info": session.info()?,
            }))
        }
        "get_statistics" => {
            let args: VersionArgs = parse_args(arguments)?;
            json_result(&session.statistics(args.version.as_deref())?)
        }
        "list_entities" => {
            let args: FilterArgs = parse_args(arguments)?;
            let entities = session.search(args.filter.as_deref().unwrap_or_default())?;
            let summaries: Vec<EntitySummary<'_>> = entities
                .iter()
                .map(|e| EntitySummary {
                    name: &e.name,
                    property_count: e.properties.len(),
                    description: e.description.as_deref(),
                })
                .collect();
            json_result(&json!({ "count": summaries.len(), "entities": summaries }))
        }
        "get_entity" => {
            let args: EntityArgs = parse_args(arguments)?;
            let entity = session.entity(&args.name)?;
            let graph = session.graph()?;
            json_result(&json!({
                "entity": entity,
                "references": graph.outgoing(&args.name).collect::<Vec<_>>(),
                "referencedBy": graph.incoming(&args.name).collect::<Vec<_>>(),
            }))
        }
        "list_relationships" => {
            let args: RelationshipArgs = parse_args(arguments)?;
            let cardinality = args
                .cardinality
                .as_deref()
                .map(str::parse::<Cardinality>)
                .transpose()
                .map_err(McpError::InvalidArguments)?;
            let relationships = session.relationships(args.entity.as_deref(), cardinality)?;
            json_result(&json!({ "count": relationships.len(), "relationships": relationships }))
        }
        "list_endpoints" => {
            let args: FilterArgs = parse_args(arguments)?;
            let endpoints = session.endpoints(args.filter.as_deref())?;
            json_result(&json!({ "count": endpoints.len(), "endpoints": endpoints }))
        }
        "classify_domains" => {
            let args: VersionArgs = parse_args(arguments)?;
            json_result(&session.classify(args.version.as_deref())?)
        }
        "generate_diagram" => {
            let args: DiagramArgs = parse_args(arguments)?;
            let format: DiagramFormat = args.format.parse()?;
            let options = RenderOptions::new(format)
                .with_properties(args.include_properties.unwrap_or(true))
                .with_descriptions(args.include_descriptions.unwrap_or(false))
                .with_filter_domains(args.filter_domains)
                .with_max_entities(args.max_entities.unwrap_or(DEFAULT_MAX_ENTITIES));
            Ok(CallToolResult::text(session.render(&options)?))
        }
        _ => Err(McpError::ToolNotFound(name.to_string())),
    }
}
