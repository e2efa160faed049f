//! # Schema Errors
//!
//! One error enum for the whole engine. The variants fall in two groups
//! that callers must keep apart:
//!
//! - [`SchemaError::ValidationFailure`] is the expected outcome for a
//!   document that does not conform to any requested version. It carries
//!   every version's violations.
//! - Everything else signals a caller or configuration mistake: a
//!   malformed version string, a version with no schema file, an empty
//!   version list, a corrupt store. These are never folded into a
//!   validation report.

use std::fmt;

use raven_core::{NamingError, SchemaName, Version, VersionError};
use serde::Serialize;
use thiserror::Error;

use crate::evaluator::Violation;

/// Errors returned by registry, validator and resolver operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The caller supplied a version string that is not `major.minor.patch`.
    #[error("malformed version: {0}")]
    MalformedVersion(#[from] VersionError),

    /// No loadable schema document exists for the exact `(name, version)`.
    ///
    /// Covers a missing file, an unreadable file and malformed JSON alike.
    #[error("schema {schema_name} version {version} not found: {reason}")]
    SchemaNotFound {
        schema_name: SchemaName,
        version: Version,
        reason: String,
    },

    /// The schema document loaded but the evaluator refused to compile it.
    #[error("schema {schema_name} version {version} is not a usable JSON Schema: {reason}")]
    InvalidSchema {
        schema_name: SchemaName,
        version: Version,
        reason: String,
    },

    /// A resolution was requested with an empty version list, or with
    /// "all versions" for a name the registry does not know.
    #[error("no versions requested for schema {schema_name}")]
    NoVersionsRequested { schema_name: SchemaName },

    /// A store entry breaks the naming grammar.
    #[error("schema store is misconfigured: {0}")]
    UnrecognizedName(#[from] NamingError),

    /// The schema store root could not be listed.
    #[error("cannot read schema store {path}: {reason}")]
    StoreUnreadable { path: String, reason: String },

    /// The strict metaschema used to audit schema documents could not be built.
    #[error("cannot build strict metaschema: {reason}")]
    MetaschemaUnavailable { reason: String },

    /// The document to validate could not be read or parsed.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoad { path: String, reason: String },

    /// Every attempted version rejected the document.
    #[error("errors validating {schema_name}:\n{failures}")]
    ValidationFailure {
        schema_name: SchemaName,
        failures: VersionFailures,
    },
}

impl SchemaError {
    /// True for the expected "document does not conform" outcome.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, SchemaError::ValidationFailure { .. })
    }
}

/// The violations one version reported against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionFailure {
    pub version: Version,
    pub violations: Vec<Violation>,
}

impl fmt::Display for VersionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  version {}:", self.version)?;
        for violation in &self.violations {
            write!(f, "\n    {violation}")?;
        }
        Ok(())
    }
}

/// Per-version failures of a resolution, in the order the versions were tried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionFailures {
    failures: Vec<VersionFailure>,
}

impl VersionFailures {
    pub fn new(failures: Vec<VersionFailure>) -> Self {
        Self { failures }
    }

    /// Returns the number of failed versions.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if no version failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[VersionFailure] {
        &self.failures
    }

    /// Versions that failed, in attempt order.
    pub fn versions(&self) -> Vec<Version> {
        self.failures.iter().map(|f| f.version).collect()
    }

    pub fn into_inner(self) -> Vec<VersionFailure> {
        self.failures
    }
}

impl fmt::Display for VersionFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}
