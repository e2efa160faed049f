//! # Schema Store Naming Grammar
//!
//! Every file in a schema store is one of two kinds, told apart purely by
//! its file name:
//!
//! ```text
//! <name>_<major>_<minor>_<patch>_schema.json
//! <name>_<major>_<minor>_<patch>_sample_(valid|invalid)[_<suffix>].json
//! ```
//!
//! Schema files hold the JSON Schema for one version. Sample files hold a
//! document that is expected to pass (`valid`) or fail (`invalid`) that
//! version's schema. Schemas and samples are correlated only through the
//! `(name, version)` pair extracted here.
//!
//! [`parse_name`] is pure: it looks at the final path component and never
//! touches the file system.

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::NamingError;
use crate::name::SchemaName;
use crate::version::{parse_component, Version};

/// Extension shared by schema and sample files.
pub const STORE_FILE_EXTENSION: &str = "json";

fn schema_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<schema_name>.+)_(?P<major>\d+)_(?P<minor>\d+)_(?P<patch>\d+)",
            r"_schema\.json$",
        ))
        .expect("schema file pattern compiles")
    })
}

fn sample_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<schema_name>.+)_(?P<major>\d+)_(?P<minor>\d+)_(?P<patch>\d+)",
            r"_sample_(?P<validity>valid|invalid)(?:_(?P<suffix>.+))?\.json$",
        ))
        .expect("sample file pattern compiles")
    })
}

/// Whether a sample document is expected to pass its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleExpectation {
    Valid,
    Invalid,
}

/// What a store entry holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// The schema document for the version.
    Schema,
    /// A sample document for the version.
    Sample {
        expectation: SampleExpectation,
        /// Free-form tail after `valid`/`invalid`, e.g. `bad_roof_type`.
        suffix: Option<String>,
    },
}

/// A store file name decoded into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreEntry {
    pub schema_name: SchemaName,
    pub version: Version,
    pub kind: EntryKind,
}

impl StoreEntry {
    pub fn is_schema(&self) -> bool {
        matches!(self.kind, EntryKind::Schema)
    }

    /// The `(name, version)` pair this entry belongs to.
    pub fn key(&self) -> (SchemaName, Version) {
        (self.schema_name.clone(), self.version)
    }
}

/// Decode a store path into `(name, version, kind)`.
///
/// Only the final path component is inspected, so both bare file names
/// and full paths are accepted.
///
/// # Errors
///
/// [`NamingError::UnrecognizedName`] when the file name matches neither
/// pattern, or matches one but carries a version component with a leading
/// zero or one too large to represent.
pub fn parse_name(path: impl AsRef<Path>) -> Result<StoreEntry, NamingError> {
    let path = path.as_ref();
    let unrecognized = || NamingError::UnrecognizedName {
        path: path.display().to_string(),
    };

    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(unrecognized)?;

    let (caps, kind) = if let Some(caps) = schema_file_regex().captures(file_name) {
        (caps, EntryKind::Schema)
    } else if let Some(caps) = sample_file_regex().captures(file_name) {
        let expectation = match &caps["validity"] {
            "valid" => SampleExpectation::Valid,
            _ => SampleExpectation::Invalid,
        };
        let suffix = caps.name("suffix").map(|m| m.as_str().to_string());
        (caps, EntryKind::Sample { expectation, suffix })
    } else {
        return Err(unrecognized());
    };

    let (schema_name, version) = name_and_version(&caps).ok_or_else(unrecognized)?;

    Ok(StoreEntry {
        schema_name,
        version,
        kind,
    })
}

fn name_and_version(caps: &Captures<'_>) -> Option<(SchemaName, Version)> {
    let schema_name = SchemaName::new(&caps["schema_name"]).ok()?;
    let version = Version::new(
        parse_component(&caps["major"])?,
        parse_component(&caps["minor"])?,
        parse_component(&caps["patch"])?,
    );
    Some((schema_name, version))
}

/// File name of the schema document for `(name, version)`.
pub fn schema_file_name(schema_name: &SchemaName, version: &Version) -> String {
    format!(
        "{schema_name}_{}_schema.{STORE_FILE_EXTENSION}",
        version.file_fragment()
    )
}
