//! # raven-schemas CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use raven_cli::check::run_check_store;
use raven_cli::list::run_list_schemas;
use raven_cli::validate::{run_validate_file, ValidateFileArgs};

/// Raven schemas CLI.
///
/// Validates JSON documents against versioned JSON Schemas, lists the
/// schema registry, and audits the schema store.
#[derive(Parser, Debug)]
#[command(name = "raven-schemas", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity.
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Schema store directory. Overrides RAVEN_SCHEMA_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON file against one or more versions of a schema.
    ValidateFile(ValidateFileArgs),

    /// Print every known schema with its versions, as JSON.
    ListSchemas,

    /// Check that schemas and samples in the store agree with each other.
    CheckStore,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = raven_cli::resolve_schema_dir(cli.schema_dir.as_deref()).and_then(|schema_dir| {
        tracing::debug!(schema_dir = %schema_dir.display(), "resolved schema store");
        match cli.command {
            Commands::ValidateFile(args) => run_validate_file(&args, &schema_dir),
            Commands::ListSchemas => run_list_schemas(&schema_dir),
            Commands::CheckStore => run_check_store(&schema_dir),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(raven_cli::EXIT_ERROR)
        }
    }
}
