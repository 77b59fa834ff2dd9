//! Endpoint and document metadata extraction from OpenAPI documents

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Operation keys recognised under a path item
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "patch", "head", "options", "trace",
];

/// One operation of the API surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    /// Upper-case HTTP method
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Endpoint {
    fn matches(&self, needle: &str) -> bool {
        self.path.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Top-level description of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
}

/// List operations in document order
///
/// `filter` matches case-insensitively against the path or any tag.
pub fn list_endpoints(document: &Value, filter: Option<&str>) -> Vec<Endpoint> {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    let needle = filter.map(str::to_lowercase).filter(|f| !f.is_empty());

    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (method, operation) in item {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let endpoint = Endpoint {
                path: path.clone(),
                method: method.to_uppercase(),
                summary: text(operation, "summary"),
                operation_id: text(operation, "operationId"),
                tags: operation
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|tags| {
                        tags.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            };
            if needle.as_deref().map_or(true, |n| endpoint.matches(n)) {
                endpoints.push(endpoint);
            }
        }
    }

    debug!(count = endpoints.len(), "Listed endpoints");
    endpoints
}

/// Read `info` and the `openapi`/`swagger` version marker
pub fn document_info(document: &Value) -> DocumentInfo {
    let info = document.get("info").unwrap_or(&Value::Null);
    DocumentInfo {
        title: text(info, "title"),
        version: text(info, "version"),
        description: text(info, "description"),
        openapi: text(document, "openapi").or_else(|| text(document, "swagger")),
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
