//! # List-Schemas Subcommand
//!
//! Prints the registry as a JSON object of family -> ascending versions.
//! Keys follow registry discovery order, not alphabetical order.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use raven_schema::{SchemaError, SchemaRegistry};

use crate::{EXIT_ERROR, EXIT_OK};

/// Execute the list-schemas subcommand.
pub fn run_list_schemas(schema_dir: &Path) -> Result<u8> {
    let registry = SchemaRegistry::new(schema_dir);
    let listing = match registry_listing(&registry) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return Ok(EXIT_ERROR);
        }
    };

    let rendered =
        serde_json::to_string_pretty(&listing).context("failed to render schema listing")?;
    println!("{rendered}");
    Ok(EXIT_OK)
}

/// The registry mapping as a JSON object, families in discovery order.
pub fn registry_listing(registry: &SchemaRegistry) -> Result<Value, SchemaError> {
    let mut listing = Map::new();
    for (schema_name, versions) in registry.known_schemas_and_versions()? {
        let versions = versions
            .iter()
            .map(|v| Value::String(v.to_string()))
            .collect();
        listing.insert(schema_name.to_string(), Value::Array(versions));
    }
    Ok(Value::Object(listing))
}
