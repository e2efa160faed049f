//! # Evaluation Capability
//!
//! The engine never interprets JSON Schema keywords itself. Structural
//! checking sits behind the narrow [`Evaluator`] trait:
//! `evaluate(schema, instance) -> violations`, where an empty list means
//! the instance conforms.
//!
//! [`JsonSchemaEvaluator`] is the production implementation, backed by the
//! `jsonschema` crate. The `$schema` keyword picks the draft; documents
//! without one are evaluated as Draft 2020-12.
//!
//! ## Retrieval
//!
//! Schema documents in the store are self-contained. Internal references
//! (`#/$defs/...`) are resolved natively; every external `$ref` is refused
//! by [`LocalOnlyRetriever`], so evaluation never touches the network or
//! files outside the store.
//!
//! ## Strictness
//!
//! JSON Schema ignores keywords it does not know, so a misspelled
//! `requried` compiles and silently checks nothing. [`StrictMetaschema`]
//! validates a schema document against Draft 2020-12 with
//! `unevaluatedProperties: false`, which turns unknown keywords into
//! violations.

use std::fmt;

use jsonschema::{Retrieve, Uri, ValidationError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// A single structural mismatch between a document and a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Violation {
    /// JSON Pointer to the violating location in the instance; `/` for the root.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Human-readable description, as produced by the evaluator.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.instance_path, self.message)
    }
}

/// The evaluator could not turn the schema document into a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SchemaRejected(pub String);

/// Black-box JSON Schema conformance checking.
pub trait Evaluator {
    /// Check `instance` against `schema`.
    ///
    /// Returns every violation found, in evaluator order. An empty vector
    /// means the instance is valid.
    ///
    /// # Errors
    ///
    /// [`SchemaRejected`] if `schema` is not a usable schema document.
    fn evaluate(&self, schema: &Value, instance: &Value) -> Result<Vec<Violation>, SchemaRejected>;

    /// Check that `schema` itself is usable, without an instance.
    fn check_schema(&self, schema: &Value) -> Result<(), SchemaRejected> {
        self.evaluate(schema, &Value::Null).map(|_| ())
    }
}

/// Refuses every external `$ref`.
struct LocalOnlyRetriever;

impl Retrieve for LocalOnlyRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!(
            "external $ref {} is not supported; schema documents must be self-contained",
            uri.as_str()
        )
        .into())
    }
}

/// [`Evaluator`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEvaluator;

impl JsonSchemaEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn compile(&self, schema: &Value) -> Result<jsonschema::Validator, SchemaRejected> {
        jsonschema::options()
            .with_retriever(LocalOnlyRetriever)
            .build(schema)
            .map_err(|e| SchemaRejected(e.to_string()))
    }
}

impl Evaluator for JsonSchemaEvaluator {
    fn evaluate(&self, schema: &Value, instance: &Value) -> Result<Vec<Violation>, SchemaRejected> {
        let validator = self.compile(schema)?;

        Ok(validator.iter_errors(instance).map(violation_from).collect())
    }

    fn check_schema(&self, schema: &Value) -> Result<(), SchemaRejected> {
        self.compile(schema).map(|_| ())
    }
}

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Draft 2020-12 metaschema that rejects unknown keywords.
///
/// Compiled once and reused for every schema document it checks.
pub struct StrictMetaschema {
    validator: jsonschema::Validator,
}

impl StrictMetaschema {
    /// # Errors
    ///
    /// [`SchemaRejected`] if the bundled Draft 2020-12 metaschema cannot be compiled.
    pub fn new() -> Result<Self, SchemaRejected> {
        let metaschema = json!({
            "$schema": DRAFT_2020_12,
            "$ref": DRAFT_2020_12,
            "unevaluatedProperties": false
        });
        let validator = jsonschema::options()
            .with_retriever(LocalOnlyRetriever)
            .build(&metaschema)
            .map_err(|e| SchemaRejected(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Every keyword or value in `schema` the strict metaschema rejects.
    pub fn violations(&self, schema: &Value) -> Vec<Violation> {
        self.validator.iter_errors(schema).map(violation_from).collect()
    }
}

impl fmt::Debug for StrictMetaschema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictMetaschema").finish_non_exhaustive()
    }
}

fn violation_from(e: ValidationError<'_>) -> Violation {
    Violation {
        instance_path: pointer_or_root(e.instance_path.to_string()),
        schema_path: pointer_or_root(e.schema_path.to_string()),
        message: e.to_string(),
    }
}

/// An empty JSON Pointer addresses the whole document; render it as `/`.
fn pointer_or_root(pointer: String) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer
    }
}
