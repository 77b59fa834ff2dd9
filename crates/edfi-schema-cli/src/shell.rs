//! Interactive shell over a [`Session`]
//!
//! One command per line. Errors are reported and the loop continues; end
//! of input or `quit` ends it.

use anyhow::{anyhow, Result};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::report;
use edfi_schema::source::SpecSource;
use edfi_schema::{DiagramFormat, RenderOptions, Session};

pub const PROMPT: &str = "edfi> ";

const HELP: &str = "\
Commands:
  load <path|url>                     Load an OpenAPI specification
  stats                               Entity and relationship counts
  entities [filter]                   List entities, optionally by name
  entity <name>                       Show one entity
  relationships [entity]              List relationships
  endpoints [filter]                  List API operations
  domains [version]                   Group entities by Ed-Fi domain
  diagram <format> [max] [domain...]  Render mermaid, plantuml or graphviz
  versions                            List taxonomy versions
  help                                Show this message
  quit | exit                         Leave the shell
";

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

pub struct Shell<'a> {
    session: &'a mut Session,
}

impl<'a> Shell<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Read commands from `input` until EOF or `quit`
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> Result<()> {
        writeln!(output, "Ed-Fi schema shell. Type 'help' for commands.")?;
        let mut line = String::new();
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            match self.execute(command) {
                Ok(Outcome::Print(text)) => write!(output, "{}", text)?,
                Ok(Outcome::Quit) => break,
                Err(e) => writeln!(output, "Error: {}", e)?,
            }
        }
        Ok(())
    }

    /// Run a single command line
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Outcome::Print(String::new()));
        };
        let args: Vec<&str> = words.collect();
        debug!(command, args = args.len(), "Shell command");

        let text = match command.to_lowercase().as_str() {
            "quit" | "exit" => return Ok(Outcome::Quit),
            "help" | "?" => HELP.to_string(),
            "load" => {
                let source: SpecSource = args
                    .first()
                    .ok_or_else(|| anyhow!("usage: load <path|url>"))?
                    .parse()?;
                let graph = self.session.load(&source)?;
                format!(
                    "Loaded {}: {} entities, {} relationships\n",
                    source,
                    graph.entity_count(),
                    graph.relationship_count()
                )
            }
            "stats" => {
                let stats = self.session.statistics(None)?;
                let info = self.session.info()?;
                report::statistics(Some(&info), &stats)
            }
            "entities" => {
                let entities = self.session.search(args.first().copied().unwrap_or_default())?;
                report::entities(&entities)
            }
            "entity" => {
                let name = args.first().ok_or_else(|| anyhow!("usage: entity <name>"))?;
                let entity = self.session.entity(name)?;
                let graph = self.session.graph()?;
                let outgoing: Vec<_> = graph.outgoing(name).collect();
                let incoming: Vec<_> = graph.incoming(name).collect();
                report::entity(entity, &outgoing, &incoming)
            }
            "relationships" => {
                let relationships = self.session.relationships(args.first().copied(), None)?;
                report::relationships(&relationships)
            }
            "endpoints" => report::endpoints(&self.session.endpoints(args.first().copied())?),
            "domains" => report::domains(&self.session.classify(args.first().copied())?),
            "diagram" => self.diagram(&args)?,
            "versions" => report::versions(
                &self.session.registry().versions(),
                self.session.default_version(),
            ),
            other => format!("Unknown command '{}'. Type 'help' for commands.\n", other),
        };
        Ok(Outcome::Print(text))
    }

    fn diagram(&self, args: &[&str]) -> Result<String> {
        let format: DiagramFormat = args
            .first()
            .ok_or_else(|| anyhow!("usage: diagram <format> [max] [domain...]"))?
            .parse()?;
        let mut options = RenderOptions::new(format);
        let mut rest = &args[1..];
        if let Some(max) = rest.first().and_then(|s| s.parse::<usize>().ok()) {
            options = options.with_max_entities(max);
            rest = &rest[1..];
        }
        options = options.with_filter_domains(rest.iter().copied());

        let mut diagram = self.session.render(&options)?;
        if !diagram.ends_with('\n') {
            diagram.push('\n');
        }
        Ok(diagram)
    }
}
