//! # Single-Version Validation
//!
//! Validates a document against one `(name, version)` schema document.
//!
//! Order of checks in [`SchemaValidator::validate`]:
//!
//! 1. The version string is parsed before any I/O. `1_0_0` is rejected
//!    with [`SchemaError::MalformedVersion`] even when a file for `1.0.0`
//!    exists, because `_` is the store's file-name encoding of `.`.
//! 2. The schema document is loaded. Any load failure is
//!    [`SchemaError::SchemaNotFound`].
//! 3. The evaluator runs. Its violation list is returned untouched: no
//!    truncation, no deduplication.
//!
//! Schema documents are loaded per call and not cached.

use std::path::{Path, PathBuf};

use raven_core::{SchemaName, Version};
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::evaluator::{Evaluator, JsonSchemaEvaluator, Violation};
use crate::store::SchemaStore;

/// Result of evaluating one document against one schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "violations", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The document conforms.
    Valid,
    /// The document does not conform; every violation found.
    Invalid(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The violations, empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(violations) => violations,
        }
    }
}

/// Validates documents against individual schema versions of a store.
#[derive(Debug, Clone)]
pub struct SchemaValidator<E = JsonSchemaEvaluator> {
    store: SchemaStore,
    evaluator: E,
}

impl SchemaValidator {
    /// Create a validator over the store at `root`, using the `jsonschema` evaluator.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_evaluator(SchemaStore::new(root), JsonSchemaEvaluator)
    }
}

impl<E: Evaluator> SchemaValidator<E> {
    pub fn with_evaluator(store: SchemaStore, evaluator: E) -> Self {
        Self { store, evaluator }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Validate `document` against `schema_name` at the version spelled `version`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::MalformedVersion`] if `version` is not `major.minor.patch`.
    /// - [`SchemaError::SchemaNotFound`] if the schema document cannot be loaded.
    /// - [`SchemaError::InvalidSchema`] if the evaluator rejects the schema document.
    pub fn validate(
        &self,
        document: &Value,
        schema_name: &SchemaName,
        version: &str,
    ) -> Result<ValidationOutcome, SchemaError> {
        let version = Version::parse(version)?;
        self.validate_version(document, schema_name, &version)
    }

    /// Validate `document` against an already parsed version.
    pub fn validate_version(
        &self,
        document: &Value,
        schema_name: &SchemaName,
        version: &Version,
    ) -> Result<ValidationOutcome, SchemaError> {
        let schema = self.store.load_schema(schema_name, version)?;
        tracing::debug!(
            schema = %schema_name,
            version = %version,
            "loaded schema document"
        );

        let violations = self
            .evaluator
            .evaluate(&schema, document)
            .map_err(|e| SchemaError::InvalidSchema {
                schema_name: schema_name.clone(),
                version: *version,
                reason: e.to_string(),
            })?;

        let outcome = ValidationOutcome::from_violations(violations);
        tracing::debug!(
            schema = %schema_name,
            version = %version,
            violations = outcome.violations().len(),
            "evaluated document"
        );
        Ok(outcome)
    }
}

/// Read a document from disk.
///
/// `.yaml` and `.yml` files are parsed as YAML; anything else as JSON.
///
/// # Errors
///
/// [`SchemaError::DocumentLoad`] if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let load_error = |reason: String| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| load_error(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}
