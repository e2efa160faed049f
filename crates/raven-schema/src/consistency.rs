//! # Store Self-Consistency
//!
//! Audits a whole schema store:
//!
//! - every entry follows the naming grammar (fatal, as in discovery);
//! - every sample has a schema for its `(name, version)` and every schema
//!   has at least one sample;
//! - a schema that pins `properties.input_schema_version.const` pins the
//!   version its file name encodes;
//! - every schema compiles;
//! - every schema uses only keywords Draft 2020-12 knows, so a typo such as
//!   `requried` is caught instead of silently checking nothing;
//! - `sample_valid` files validate and `sample_invalid` files do not.
//!
//! All problems are collected into a [`StoreReport`] instead of stopping at
//! the first one. The audit reads the resolver's memoized scan, so it sees
//! exactly the entries resolution sees.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use raven_core::{EntryKind, SampleExpectation, SchemaName, Version};
use serde_json::Value;

use crate::error::SchemaError;
use crate::evaluator::{Evaluator, StrictMetaschema, Violation};
use crate::resolve::Resolver;
use crate::validate::load_document;

/// One inconsistency found in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreProblem {
    /// A sample whose `(name, version)` has no schema file.
    SampleWithoutSchema { path: PathBuf },
    /// A schema file with no sample files.
    SchemaWithoutSamples { path: PathBuf },
    /// The schema body pins a different version than its file name.
    VersionMismatch {
        path: PathBuf,
        file_version: Version,
        declared: String,
    },
    /// The schema file could not be loaded.
    SchemaUnreadable { path: PathBuf, reason: String },
    /// The evaluator rejects the schema document.
    SchemaDoesNotCompile { path: PathBuf, reason: String },
    /// The schema compiles but uses keywords Draft 2020-12 does not define.
    SchemaNotStrict {
        path: PathBuf,
        violations: Vec<Violation>,
    },
    /// The sample file could not be loaded.
    SampleUnreadable { path: PathBuf, reason: String },
    /// A sample validated when it should not have, or the reverse.
    SampleOutcomeMismatch {
        path: PathBuf,
        expectation: SampleExpectation,
        violations: usize,
    },
}

impl fmt::Display for StoreProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleWithoutSchema { path } => {
                write!(f, "{}: sample has no matching schema file", path.display())
            }
            Self::SchemaWithoutSamples { path } => {
                write!(f, "{}: schema has no sample files", path.display())
            }
            Self::VersionMismatch {
                path,
                file_version,
                declared,
            } => write!(
                f,
                "{}: declares input_schema_version {declared:?} but file name says {file_version}",
                path.display()
            ),
            Self::SchemaUnreadable { path, reason } => {
                write!(f, "{}: cannot load schema: {reason}", path.display())
            }
            Self::SchemaDoesNotCompile { path, reason } => {
                write!(f, "{}: schema does not compile: {reason}", path.display())
            }
            Self::SchemaNotStrict { path, violations } => {
                write!(f, "{}: schema is not strict Draft 2020-12:", path.display())?;
                for (i, violation) in violations.iter().enumerate() {
                    let sep = if i == 0 { " " } else { "; " };
                    write!(f, "{sep}{violation}")?;
                }
                Ok(())
            }
            Self::SampleUnreadable { path, reason } => {
                write!(f, "{}: cannot load sample: {reason}", path.display())
            }
            Self::SampleOutcomeMismatch {
                path,
                expectation: SampleExpectation::Valid,
                violations,
            } => write!(
                f,
                "{}: sample should be valid but has {violations} violation(s)",
                path.display()
            ),
            Self::SampleOutcomeMismatch { path, .. } => {
                write!(f, "{}: sample should be invalid but validated", path.display())
            }
        }
    }
}

/// Outcome of [`check_store`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    pub schemas_checked: usize,
    pub samples_checked: usize,
    pub problems: Vec<StoreProblem>,
}

impl StoreReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// The version a schema pins via `properties.input_schema_version.const`, if any.
pub fn declared_version(schema: &Value) -> Option<&Value> {
    schema
        .get("properties")?
        .get("input_schema_version")?
        .get("const")
}

/// Audit the store behind `resolver`, evaluating samples with its evaluator.
///
/// # Errors
///
/// [`SchemaError::UnrecognizedName`] or [`SchemaError::StoreUnreadable`]
/// if the store cannot be listed, [`SchemaError::MetaschemaUnavailable`]
/// if the strict metaschema cannot be built. Everything else is reported
/// as a [`StoreProblem`].
pub fn check_store<E: Evaluator>(resolver: &Resolver<E>) -> Result<StoreReport, SchemaError> {
    let registry = resolver.registry();
    let evaluator = resolver.validator().evaluator();
    let strict = StrictMetaschema::new()
        .map_err(|e| SchemaError::MetaschemaUnavailable { reason: e.0 })?;

    let entries = registry.entries()?;
    let mut report = StoreReport::default();

    let mut schemas: BTreeMap<(SchemaName, Version), PathBuf> = BTreeMap::new();
    let mut samples: Vec<(PathBuf, (SchemaName, Version), SampleExpectation)> = Vec::new();
    for (path, entry) in entries {
        let key = entry.key();
        match entry.kind {
            EntryKind::Schema => {
                schemas.insert(key, path.clone());
            }
            EntryKind::Sample { expectation, .. } => {
                samples.push((path.clone(), key, expectation));
            }
        }
    }

    let sampled: BTreeSet<&(SchemaName, Version)> =
        samples.iter().map(|(_, key, _)| key).collect();

    // Schemas that loaded and compiled; samples are only evaluated against these.
    let mut usable: BTreeMap<(SchemaName, Version), Value> = BTreeMap::new();

    for (key, path) in &schemas {
        report.schemas_checked += 1;
        let (schema_name, version) = key;

        if !sampled.contains(key) {
            report.problems.push(StoreProblem::SchemaWithoutSamples { path: path.clone() });
        }

        let schema = match registry.store().load_schema(schema_name, version) {
            Ok(schema) => schema,
            Err(e) => {
                report.problems.push(StoreProblem::SchemaUnreadable {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(declared) = declared_version(&schema) {
            if declared.as_str() != Some(version.to_string().as_str()) {
                report.problems.push(StoreProblem::VersionMismatch {
                    path: path.clone(),
                    file_version: *version,
                    declared: declared.to_string(),
                });
            }
        }

        if let Err(e) = evaluator.check_schema(&schema) {
            report.problems.push(StoreProblem::SchemaDoesNotCompile {
                path: path.clone(),
                reason: e.to_string(),
            });
            continue;
        }

        let violations = strict.violations(&schema);
        if !violations.is_empty() {
            report.problems.push(StoreProblem::SchemaNotStrict {
                path: path.clone(),
                violations,
            });
        }

        usable.insert(key.clone(), schema);
    }

    for (path, key, expectation) in samples {
        report.samples_checked += 1;

        if !schemas.contains_key(&key) {
            report.problems.push(StoreProblem::SampleWithoutSchema { path });
            continue;
        }
        let Some(schema) = usable.get(&key) else {
            continue;
        };

        let document = match load_document(&path) {
            Ok(document) => document,
            Err(e) => {
                report.problems.push(StoreProblem::SampleUnreadable {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let violations = match evaluator.evaluate(schema, &document) {
            Ok(violations) => violations.len(),
            Err(e) => {
                report.problems.push(StoreProblem::SchemaDoesNotCompile {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let as_expected = match expectation {
            SampleExpectation::Valid => violations == 0,
            SampleExpectation::Invalid => violations > 0,
        };
        if !as_expected {
            report.problems.push(StoreProblem::SampleOutcomeMismatch {
                path,
                expectation,
                violations,
            });
        }
    }

    for problem in &report.problems {
        tracing::warn!(store = %registry.store().root().display(), "{problem}");
    }
    tracing::info!(
        schemas = report.schemas_checked,
        samples = report.samples_checked,
        problems = report.problems.len(),
        "checked schema store"
    );

    Ok(report)
}
