//! Command-line interface for the edfi-schema utility
//!
//! Provides subcommands to inspect an Ed-Fi OpenAPI specification, render
//! entity diagrams and run an interactive shell.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::colorizer::colorize_output;
use crate::report;
use crate::shell::Shell;
use edfi_schema::config::{SourceConfig, ENV_SPEC_SOURCE};
use edfi_schema::domains::TaxonomyRegistry;
use edfi_schema::source::SpecSource;
use edfi_schema::{Cardinality, DiagramFormat, RenderOptions, Session, DEFAULT_MAX_ENTITIES};

/// edfi-schema - Explore Ed-Fi OpenAPI specifications
#[derive(Parser)]
#[command(name = "edfi-schema")]
#[command(about = "Inspect Ed-Fi OpenAPI specifications and render entity-relationship diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// OpenAPI document path or URL (defaults to EDFI_SPEC_SOURCE)
    #[arg(long, global = true)]
    pub spec: Option<String>,

    /// Custom domain taxonomy JSON, merged over the built-in one
    #[arg(long, global = true)]
    pub taxonomy: Option<PathBuf>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show entity, relationship and domain counts
    Stats {
        /// Data standard version used for domain counts
        #[arg(long = "version", value_name = "VERSION")]
        data_standard: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List entities
    Entities {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one entity with its properties and relationships
    Entity {
        /// Entity (schema) name
        name: String,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List relationships
    Relationships {
        /// Only relationships touching this entity
        #[arg(short, long)]
        entity: Option<String>,

        /// Only relationships of this cardinality
        #[arg(long = "type", value_name = "CARDINALITY")]
        cardinality: Option<Cardinality>,
    },

    /// List API endpoints
    Endpoints {
        /// Case-insensitive path or tag filter
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Group entities by Ed-Fi domain
    Domains {
        /// Data standard version of the taxonomy
        #[arg(long = "version", value_name = "VERSION")]
        data_standard: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render an entity-relationship diagram
    Diagram {
        /// Diagram grammar
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Mermaid)]
        format: FormatChoice,

        /// Maximum number of entities drawn
        #[arg(short, long, default_value_t = DEFAULT_MAX_ENTITIES)]
        max_entities: usize,

        /// Keep entities whose name contains this text (repeatable)
        #[arg(short, long)]
        domain: Vec<String>,

        /// Draw entity names only
        #[arg(long)]
        no_properties: bool,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// List data standard versions with a domain taxonomy
    Versions,

    /// Manage the specification download cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Start an interactive shell
    Shell,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheAction {
    /// Delete every cached specification
    Clear,
}

/// Supported diagram grammars
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Mermaid,
    Plantuml,
    #[value(alias = "dot")]
    Graphviz,
}

impl From<FormatChoice> for DiagramFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Mermaid => DiagramFormat::Mermaid,
            FormatChoice::Plantuml => DiagramFormat::PlantUml,
            FormatChoice::Graphviz => DiagramFormat::Graphviz,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct EdfiSchemaApp {
    config: SourceConfig,
    session: Session,
}

impl EdfiSchemaApp {
    /// Create a new application instance configured from the environment
    pub fn new() -> Self {
        Self::with_config(SourceConfig::from_env())
    }

    pub fn with_config(config: SourceConfig) -> Self {
        let session = Session::new(&config);
        Self { config, session }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("edfi-schema v{}", env!("CARGO_PKG_VERSION"));
        }

        if let Some(path) = &cli.taxonomy {
            let mut registry = TaxonomyRegistry::builtin();
            registry.merge(TaxonomyRegistry::from_file(path)?);
            let session = std::mem::take(&mut self.session);
            self.session = session.with_registry(registry);
        }

        let spec = cli.spec.as_deref();
        let text = match cli.command {
            Commands::Stats {
                data_standard,
                json,
            } => {
                self.ensure_loaded(spec, cli.verbose)?;
                self.stats_command(data_standard.as_deref(), json)?
            }
            Commands::Entities { filter, json } => {
                self.ensure_loaded(spec, cli.verbose)?;
                self.entities_command(filter.as_deref(), json)?
            }
            Commands::Entity { name, json } => {
                self.ensure_loaded(spec, cli.verbose)?;
                self.entity_command(&name, json)?
            }
            Commands::Relationships {
                entity,
                cardinality,
            } => {
                self.ensure_loaded(spec, cli.verbose)?;
                self.relationships_command(entity.as_deref(), cardinality)?
            }
            Commands::Endpoints { filter } => {
                self.ensure_loaded(spec, cli.verbose)?;
                report::endpoints(&self.session.endpoints(filter.as_deref())?)
            }
            Commands::Domains {
                data_standard,
                json,
            } => {
                self.ensure_loaded(spec, cli.verbose)?;
                self.domains_command(data_standard.as_deref(), json)?
            }
            Commands::Diagram {
                format,
                max_entities,
                domain,
                no_properties,
                output,
                color,
            } => {
                self.ensure_loaded(spec, cli.verbose)?;
                let options = RenderOptions::new(format.into())
                    .with_max_entities(max_entities)
                    .with_filter_domains(domain)
                    .with_properties(!no_properties);
                return self.diagram_command(&options, output, color, cli.verbose);
            }
            Commands::Versions => report::versions(
                &self.session.registry().versions(),
                self.session.default_version(),
            ),
            Commands::Cache {
                action: CacheAction::Clear,
            } => {
                let removed = self.session.cache().clear()?;
                format!(
                    "Removed {} cached specification(s) from {}\n",
                    removed,
                    self.session.cache().dir().display()
                )
            }
            Commands::Shell => {
                if spec.is_some() || self.config.spec_source.is_some() {
                    self.ensure_loaded(spec, cli.verbose)?;
                }
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                return Shell::new(&mut self.session).run(stdin.lock(), &mut stdout);
            }
        };

        self.write_output(None, &text)
    }

    /// Load the document named on the command line or in the environment
    fn ensure_loaded(&mut self, spec: Option<&str>, verbose: bool) -> Result<()> {
        let raw = spec
            .map(str::to_string)
            .or_else(|| self.config.spec_source.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No specification source; pass --spec or set {}",
                    ENV_SPEC_SOURCE
                )
            })?;
        let source: SpecSource = raw.parse()?;
        let graph = self.session.load(&source)?;
        if verbose {
            eprintln!(
                "Loaded {} entities and {} relationships from {}",
                graph.entity_count(),
                graph.relationship_count(),
                source
            );
        }
        Ok(())
    }

    /// Handle the stats command
    pub fn stats_command(&self, version: Option<&str>, json: bool) -> Result<String> {
        let stats = self.session.statistics(version)?;
        if json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(&stats)?));
        }
        Ok(report::statistics(Some(&self.session.info()?), &stats))
    }

    /// Handle the entities command
    pub fn entities_command(&self, filter: Option<&str>, json: bool) -> Result<String> {
        let entities = self.session.search(filter.unwrap_or_default())?;
        if json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(&entities)?));
        }
        Ok(report::entities(&entities))
    }

    /// Handle the entity command
    pub fn entity_command(&self, name: &str, json: bool) -> Result<String> {
        let entity = self.session.entity(name)?;
        if json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(entity)?));
        }
        let graph = self.session.graph()?;
        let outgoing: Vec<_> = graph.outgoing(name).collect();
        let incoming: Vec<_> = graph.incoming(name).collect();
        Ok(report::entity(entity, &outgoing, &incoming))
    }

    /// Handle the relationships command
    pub fn relationships_command(
        &self,
        entity: Option<&str>,
        cardinality: Option<Cardinality>,
    ) -> Result<String> {
        let relationships = self.session.relationships(entity, cardinality)?;
        Ok(report::relationships(&relationships))
    }

    /// Handle the domains command
    pub fn domains_command(&self, version: Option<&str>, json: bool) -> Result<String> {
        let classification = self.session.classify(version)?;
        if json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(&classification)?));
        }
        Ok(report::domains(&classification))
    }

    /// Handle the diagram command
    pub fn diagram_command(
        &self,
        options: &RenderOptions,
        output: Option<PathBuf>,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let diagram = self.session.render(options)?;
        info!(format = %options.format, bytes = diagram.len(), "Diagram generated");
        if verbose {
            eprintln!("Rendered {} diagram", options.format);
        }

        let final_output = if self.should_colorize(&output, color) {
            colorize_output(&diagram)
        } else {
            diagram
        };
        self.write_output(output, &final_output)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        let to_stdout = match output {
            None => true,
            Some(p) => p.to_str() == Some("-"),
        };
        match color {
            ColorChoice::Always => to_stdout,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                to_stdout && crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Get a mutable reference to the session (for testing)
    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl Default for EdfiSchemaApp {
    fn default() -> Self {
        Self::new()
    }
}
