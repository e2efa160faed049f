//! # Validate-File Subcommand
//!
//! Resolves one document against versions of one schema family.
//!
//! With no `-v` flags every known version of the family is tried.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use raven_core::{SchemaName, Version};
use raven_schema::{load_document, Resolver, SchemaError, VersionSelection};

use crate::{EXIT_ERROR, EXIT_FAILURE, EXIT_OK};

/// Arguments for the `raven-schemas validate-file` subcommand.
#[derive(Args, Debug)]
pub struct ValidateFileArgs {
    /// Schema family to validate against.
    #[arg(short = 's', long, value_name = "NAME")]
    pub schema_name: String,

    /// Version to try, as `major.minor.patch`. Repeatable; omit to try all known versions.
    #[arg(short = 'v', long = "schema-version", value_name = "VERSION")]
    pub schema_versions: Vec<String>,

    /// Document to validate (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(short = 'f', long, value_name = "PATH")]
    pub json_file: PathBuf,
}

/// Execute the validate-file subcommand.
///
/// Returns exit code: 0 when at least one version matched, 1 when every
/// version failed, 2 when the request could not be carried out.
pub fn run_validate_file(args: &ValidateFileArgs, schema_dir: &Path) -> Result<u8> {
    let resolver = Resolver::new(schema_dir);

    let schema_name = match known_schema(&resolver, &args.schema_name) {
        Ok(name) => name,
        Err(message) => {
            eprintln!("ERROR: {message}");
            return Ok(EXIT_ERROR);
        }
    };

    let document = match load_document(&args.json_file) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return Ok(EXIT_ERROR);
        }
    };

    let selection = VersionSelection::from_args(args.schema_versions.clone());
    match resolver.resolve(&document, &schema_name, &selection) {
        Ok(matched) => {
            println!(
                "OK: {} matches {schema_name} {}",
                args.json_file.display(),
                join_versions(&matched)
            );
            Ok(EXIT_OK)
        }
        Err(e @ SchemaError::ValidationFailure { .. }) => {
            println!("FAIL: {}", args.json_file.display());
            println!("{e}");
            Ok(EXIT_FAILURE)
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            Ok(EXIT_ERROR)
        }
    }
}

/// Parse `raw` and check it names a family in the store.
fn known_schema(resolver: &Resolver, raw: &str) -> std::result::Result<SchemaName, String> {
    let name = SchemaName::new(raw).map_err(|e| e.to_string())?;
    let known = resolver
        .registry()
        .list_known_schemas()
        .map_err(|e| e.to_string())?;

    if known.contains(&name) {
        Ok(name)
    } else {
        let choices: Vec<&str> = known.iter().map(SchemaName::as_str).collect();
        Err(format!(
            "unknown schema name {raw:?} (known: {})",
            if choices.is_empty() {
                "none".to_string()
            } else {
                choices.join(", ")
            }
        ))
    }
}

fn join_versions(versions: &[Version]) -> String {
    versions
        .iter()
        .map(Version::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
