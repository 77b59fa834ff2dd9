//! Structured logging for the loader, analyzer, renderers and hosts
//!
//! Every pipeline stage opens a `tracing` span (`load`, `analyze`,
//! `select_entities`, `render_<grammar>`, `classify_domains`,
//! `execute_tool`), so output can be narrowed by module path:
//!
//! ```bash
//! RUST_LOG="edfi_schema::analyzer=debug" edfi-schema stats --spec swagger.json
//! EDFI_SCHEMA_LOG_LEVEL=trace EDFI_SCHEMA_LOG_FORMAT=json edfi-schema-mcp
//! ```
//!
//! Output always goes to stderr. Stdout carries diagram source and, in the
//! MCP server, protocol frames.

use std::env;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

pub const ENV_LOG_LEVEL: &str = "EDFI_SCHEMA_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "EDFI_SCHEMA_LOG_FORMAT";

/// Crates that are noisy at debug level while fetching documents
const QUIET_DEPENDENCIES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls"];

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets
    #[default]
    Compact,
    /// Multi-line with source locations and span activity
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Unknown log format: {} (expected one of: {})",
                s,
                LogFormat::variants().join(", ")
            )),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolved filter directives and output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from explicit values, then `lookup`, then defaults
    ///
    /// Level order: `level`, `EDFI_SCHEMA_LOG_LEVEL`, `RUST_LOG`, `info`.
    /// A bare level (no `=` or `,`) also caps the HTTP stack at `warn`.
    pub fn resolve<F>(level: Option<&str>, format: Option<&str>, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let level = level
            .map(str::to_string)
            .filter(|l| !l.trim().is_empty())
            .or_else(|| get(ENV_LOG_LEVEL))
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        let format = match format.map(str::to_string).or_else(|| get(ENV_LOG_FORMAT)) {
            Some(name) if !name.trim().is_empty() => name.parse()?,
            _ => LogFormat::default(),
        };

        Ok(Self {
            directives: expand_level(level.trim()),
            format,
        })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directives).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn expand_level(level: &str) -> String {
    if level.eq_ignore_ascii_case("off") || level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = level.to_string();
    for krate in QUIET_DEPENDENCIES {
        directives.push_str(&format!(",{}=warn", krate));
    }
    directives
}

/// Install the global subscriber
///
/// `level` and `format` override the environment. Fails on an unknown
/// format or when a global subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format, |key| env::var(key).ok())
        .map_err(|e| format!("Invalid log format: {}", e))?;
    install(&settings)
}

fn install(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    let compact = (settings.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });
    let pretty = (settings.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::ACTIVE)
            .pretty()
    });
    let json = (settings.format == LogFormat::Json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
    });

    Registry::default()
        .with(settings.filter())
        .with(compact)
        .with(pretty)
        .with(json)
        .try_init()?;
    Ok(())
}
