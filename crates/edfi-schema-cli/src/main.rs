//! edfi-schema CLI - Explore Ed-Fi OpenAPI specifications

mod cli;
mod colorizer;
mod report;
mod shell;

use clap::Parser;
use edfi_schema::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Explicit flags win; otherwise init_logging falls back to the environment
    let level = match (cli_args.log_level, cli_args.verbose) {
        (Some(level), _) => Some(level.as_str()),
        (None, true) => Some("debug"),
        (None, false) => None,
    };
    if let Err(e) = init_logging(level, cli_args.log_format.map(|f| f.as_str())) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let mut app = cli::EdfiSchemaApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
