//! Ed-Fi schema Model Context Protocol (MCP) server
//!
//! Exposes a loaded Ed-Fi OpenAPI specification to AI/LLM clients:
//!
//! - **Load** a specification from a file or URL (cached on disk)
//! - **Query** entities, relationships, endpoints and statistics
//! - **Classify** entities into Ed-Fi domains
//! - **Render** Mermaid, PlantUML or Graphviz diagrams
//!
//! ```no_run
//! use edfi_schema::{config::SourceConfig, Session};
//! use edfi_schema_mcp::{McpServer, McpServerConfig};
//!
//! let session = Session::new(&SourceConfig::from_env());
//! let mut server = McpServer::new(McpServerConfig::default(), session);
//! server.run_stdio().expect("server failed");
//! ```

mod error;
pub mod prompts;
mod protocol;
mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use protocol::*;
pub use server::{McpServer, McpServerConfig, PROTOCOL_VERSION};
pub use tools::{execute_tool, get_tools};

/// MCP server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name for MCP protocol
pub const SERVER_NAME: &str = "edfi-schema-mcp";
