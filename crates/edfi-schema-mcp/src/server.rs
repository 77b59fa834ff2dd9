//! MCP server over a line-delimited JSON-RPC stdio transport.

use serde::Serialize;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, info, warn};

use crate::error::{McpResult, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::prompts::{get_prompt, get_prompts};
use crate::protocol::{
    CallToolParams, CallToolResult, GetPromptParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListChanged, ListPromptsResult, ListToolsResult, ServerCapabilities,
    ServerInfo,
};
use crate::tools::{execute_tool, get_tools};
use crate::{SERVER_NAME, VERSION};
use edfi_schema::Session;

/// Protocol revision advertised during the handshake
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name and version reported in the handshake
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: VERSION.to_string(),
        }
    }
}

/// Ed-Fi schema MCP server.
///
/// Owns one [`Session`]; `load_spec` replaces the loaded document and every
/// other tool queries it. Requests are handled one at a time in arrival
/// order.
pub struct McpServer {
    config: McpServerConfig,
    session: Session,
    initialized: bool,
}

impl McpServer {
    pub fn new(config: McpServerConfig, session: Session) -> Self {
        Self {
            config,
            session,
            initialized: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve requests from stdin until it closes.
    pub fn run_stdio(&mut self) -> McpResult<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        info!("Ed-Fi schema MCP server starting on stdio");
        self.serve(BufReader::new(stdin.lock()), stdout.lock())
    }

    /// Serve one JSON-RPC message per input line, writing one response per line.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> McpResult<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received: {}", line);

            if let Some(response) = self.handle_message(&line) {
                let response_str = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_str);
                writeln!(writer, "{}", response_str)?;
                writer.flush()?;
            }
        }
        info!("Input closed, server stopping");
        Ok(())
    }

    /// Handle one raw message; notifications produce no response.
    pub fn handle_message(&mut self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) if request.is_notification() => {
                debug!(method = %request.method, "Notification");
                None
            }
            Ok(request) => Some(self.handle_request(request)),
            Err(e) => Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
        }
    }

    pub fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => JsonRpcResponse::success(id, json!({})),
            "shutdown" => self.handle_shutdown(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => respond(id, &ListToolsResult { tools: get_tools() }),
            "tools/call" => self.handle_tools_call(id, request.params),
            "prompts/list" => respond(id, &ListPromptsResult { prompts: get_prompts() }),
            "prompts/get" => handle_prompts_get(id, request.params),
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
            }
        }
    }

    fn handle_initialize(&mut self, id: Option<Value>) -> JsonRpcResponse {
        self.initialized = true;
        info!("Server initialized");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChanged { list_changed: false }),
                prompts: Some(ListChanged { list_changed: false }),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };
        respond(id, &result)
    }

    fn handle_shutdown(&mut self, id: Option<Value>) -> JsonRpcResponse {
        info!("Server shutting down");
        self.initialized = false;
        JsonRpcResponse::success(id, json!({}))
    }

    /// Tool failures are successful responses carrying `isError: true`.
    fn handle_tools_call(&mut self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, message),
        };

        let result = match execute_tool(&params.name, params.arguments, &mut self.session) {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool failed");
                CallToolResult::error(format!("Error: {}", e))
            }
        };
        respond(id, &result)
    }
}

fn handle_prompts_get(id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
    let params: GetPromptParams = match parse_params(params) {
        Ok(params) => params,
        Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, message),
    };
    match get_prompt(&params.name, params.arguments.as_ref()) {
        Ok(result) => respond(id, &result),
        Err(e) => JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| format!("Invalid params: {}", e)),
        None => Err("Missing params".to_string()),
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
    }
}
