//! Canned prompts that walk a client through the tools.

use serde_json::Value;

use crate::error::{McpError, McpResult};
use crate::protocol::{Content, GetPromptResult, Prompt, PromptArgument, PromptMessage};

/// Get all available prompts.
pub fn get_prompts() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "explore_domain".to_string(),
            description: "Survey one Ed-Fi domain: its entities, how they relate, and the endpoints that serve them.".to_string(),
            arguments: vec![PromptArgument {
                name: "domain".to_string(),
                description: "Domain name as listed by classify_domains".to_string(),
                required: true,
            }],
        },
        Prompt {
            name: "diagram_entities".to_string(),
            description: "Produce an entity-relationship diagram around a set of entity names.".to_string(),
            arguments: vec![
                PromptArgument {
                    name: "entities".to_string(),
                    description: "Comma-separated name fragments to keep".to_string(),
                    required: true,
                },
                PromptArgument {
                    name: "format".to_string(),
                    description: "mermaid, plantuml or graphviz (default mermaid)".to_string(),
                    required: false,
                },
            ],
        },
    ]
}

fn required_arg<'a>(arguments: Option<&'a Value>, name: &str) -> McpResult<&'a str> {
    arguments
        .and_then(|args| args.get(name))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| McpError::InvalidArguments(format!("missing prompt argument '{}'", name)))
}

fn user_message(text: String) -> PromptMessage {
    PromptMessage {
        role: "user".to_string(),
        content: Content::Text { text },
    }
}

/// Expand a prompt by name with its arguments.
pub fn get_prompt(name: &str, arguments: Option<&Value>) -> McpResult<GetPromptResult> {
    match name {
        "explore_domain" => {
            let domain = required_arg(arguments, "domain")?;
            Ok(GetPromptResult {
                description: format!("Explore the '{}' domain", domain),
                messages: vec![user_message(format!(
                    "Explore the Ed-Fi '{domain}' domain.\n\
                     1. Call classify_domains and read the entity list under '{key}'.\n\
                     2. Call get_entity for the central entities to see their properties and references.\n\
                     3. Call list_relationships for those entities and summarize which are one-to-one and which are one-to-many.\n\
                     4. Call list_endpoints with the most relevant resource names.\n\
                     Finish with a short description of what the domain models.",
                    domain = domain,
                    key = domain.to_lowercase()
                ))],
            })
        }
        "diagram_entities" => {
            let entities = required_arg(arguments, "entities")?;
            let format = arguments
                .and_then(|args| args.get("format"))
                .and_then(Value::as_str)
                .unwrap_or("mermaid");
            let filters: Vec<&str> = entities
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            Ok(GetPromptResult {
                description: format!("Diagram entities matching {}", filters.join(", ")),
                messages: vec![user_message(format!(
                    "Call generate_diagram with format '{}' and filterDomains {:?}. \
                     If the diagram is crowded, lower maxEntities or set includeProperties to false. \
                     Return the diagram source unchanged, then list the relationships it shows.",
                    format, filters
                ))],
            })
        }
        _ => Err(McpError::PromptNotFound(name.to_string())),
    }
}
