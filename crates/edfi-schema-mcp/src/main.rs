//! edfi-schema MCP server binary.
//!
//! ```bash
//! # Start empty; clients call load_spec
//! edfi-schema-mcp
//!
//! # Preload a specification
//! edfi-schema-mcp --spec https://api.ed-fi.org/v7.1/api/metadata/data/v3/resources/swagger.json
//!
//! # Debug logging (always on stderr; stdout carries the protocol)
//! edfi-schema-mcp --log-level debug
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use edfi_schema::config::SourceConfig;
use edfi_schema::core::logging::init_logging;
use edfi_schema::source::SpecSource;
use edfi_schema::Session;
use edfi_schema_mcp::{McpServer, McpServerConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "edfi-schema-mcp")]
#[command(version)]
#[command(about = "Ed-Fi OpenAPI Model Context Protocol (MCP) server")]
struct Cli {
    /// Specification to load at startup (path or URL); defaults to EDFI_SPEC_SOURCE
    #[arg(short, long)]
    spec: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (compact, pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref(), cli.log_format.as_deref())
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let config = SourceConfig::from_env();
    let mut session = Session::new(&config);

    if let Some(raw) = cli.spec.or_else(|| config.spec_source.clone()) {
        let source: SpecSource = raw.parse()?;
        session
            .load(&source)
            .with_context(|| format!("failed to load {}", source))?;
        info!(%source, "Preloaded specification");
    }

    let mut server = McpServer::new(McpServerConfig::default(), session);
    server.run_stdio()?;
    Ok(())
}
