//! # Error Types
//!
//! Errors raised while parsing the core primitives: versions, schema
//! family names, and schema-store file names. All use `thiserror`.
//!
//! None of these involve I/O. They describe malformed caller input or a
//! store entry that breaks the naming grammar.

use thiserror::Error;

/// A version string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string uses `_` where `.` is required.
    ///
    /// The store encodes `1.0.0` as `1_0_0` in file names, so accepting
    /// `1_0_0` here would let two spellings address the same file.
    #[error("version {0:?} should be in the form '1.0.0', not '1_0_0'")]
    Separator(String),

    /// The string is not three dot-separated decimal components.
    #[error("version {version:?} is not of the form major.minor.patch: {reason}")]
    Format {
        /// The rejected input.
        version: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// A schema family name is not acceptable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Empty names are rejected.
    #[error("schema name must not be empty")]
    Empty,

    /// The name contains characters outside `[a-z0-9_]` or does not start
    /// with a lowercase letter.
    #[error("schema name {0:?} must start with a lowercase letter and contain only [a-z0-9_]")]
    InvalidCharacters(String),
}

/// A store entry does not follow the schema-store naming grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The file name matches neither the schema nor the sample pattern.
    #[error("{path} matches neither the schema pattern nor the sample pattern")]
    UnrecognizedName {
        /// The offending path, as given.
        path: String,
    },
}
