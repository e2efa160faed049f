//! # raven-core: Foundational Types for Raven Schemas
//!
//! Defines the primitives every other crate in the workspace builds on:
//!
//! - [`Version`]: a strictly parsed `major.minor.patch` triple. `_` is
//!   rejected as a separator so a version string can never alias a store
//!   file-name fragment.
//! - [`SchemaName`]: a validated schema family identifier.
//! - [`naming`]: the schema-store file naming grammar
//!   ([`parse_name`], [`schema_file_name`]).
//!
//! ## Crate Policy
//!
//! - No I/O. Everything here is a pure function of its inputs.
//! - No dependencies on other `raven-*` crates.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod name;
pub mod naming;
pub mod version;

pub use error::{NameError, NamingError, VersionError};
pub use name::SchemaName;
pub use naming::{parse_name, schema_file_name, EntryKind, SampleExpectation, StoreEntry};
pub use version::Version;
