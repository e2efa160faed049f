//! # raven-schema: Versioned Schema Resolution
//!
//! Validates documents against a directory of versioned JSON Schemas and
//! answers which versions of a schema family a document satisfies.
//!
//! ## Store (`store`, `registry`)
//!
//! A [`SchemaStore`] is one flat directory of schema and sample files named
//! per [`raven_core::naming`]. The [`SchemaRegistry`] scans it once and
//! memoizes the family -> versions index.
//!
//! ## Validation (`validate`, `resolve`)
//!
//! - [`SchemaValidator::validate`] checks a document against one version
//!   and returns a [`ValidationOutcome`].
//! - [`Resolver::resolve`] checks a document against several versions,
//!   attempting every one, and returns all that matched or a
//!   [`SchemaError::ValidationFailure`] carrying each version's violations.
//!
//! ## Store Auditing (`consistency`)
//!
//! [`check_store`] audits the store behind a [`Resolver`]. It verifies
//! that samples and schemas pair up, that schemas compile, use only known
//! keywords and pin the right version, and that every sample validates as
//! its file name says it should.
//!
//! ## Crate Policy
//!
//! - Depends only on `raven-core` internally.
//! - Schemas are evaluated offline: `$ref`s to anything outside the schema
//!   document are refused.
//! - A missing or broken schema is never reported as a validation failure.

pub mod consistency;
pub mod error;
pub mod evaluator;
pub mod registry;
pub mod resolve;
pub mod store;
pub mod validate;

pub use consistency::{check_store, StoreProblem, StoreReport};
pub use error::{SchemaError, VersionFailure, VersionFailures};
pub use evaluator::{
    Evaluator, JsonSchemaEvaluator, SchemaRejected, StrictMetaschema, Violation,
};
pub use registry::{SchemaIndex, SchemaRegistry};
pub use resolve::{Resolver, VersionSelection};
pub use store::SchemaStore;
pub use validate::{load_document, SchemaValidator, ValidationOutcome};
