//! # raven-cli: Command-Line Interface for Raven Schemas
//!
//! Provides the `raven-schemas` binary.
//!
//! ## Subcommands
//!
//! - `raven-schemas validate-file`: resolve a document against versions of a schema.
//! - `raven-schemas list-schemas`: print the registry as JSON.
//! - `raven-schemas check-store`: audit the schema store.
//!
//! ```bash
//! raven-schemas validate-file -s modeling_input -v 1.0.0 -v 1.0.1 -f survey.json
//! raven-schemas validate-file -s modeling_input -f survey.json
//! raven-schemas --schema-dir ./schemas list-schemas
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: success.
//! - `1`: the document failed every version, or the store has problems.
//! - `2`: the request or the environment is wrong: unknown schema or
//!   version, malformed version, unreadable document or store.
//!
//! ## Crate Policy
//!
//! - Handler functions delegate to `raven-schema`; no validation logic here.
//! - Handlers print their own report and return the exit code.

pub mod check;
pub mod list;
pub mod validate;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the schema store directory.
pub const SCHEMA_DIR_ENV: &str = "RAVEN_SCHEMA_DIR";

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_ERROR: u8 = 2;

/// Resolve the schema store directory for this process.
///
/// Order: `explicit` (the `--schema-dir` flag), then `RAVEN_SCHEMA_DIR`,
/// then the first ancestor of the current directory containing `schemas/`,
/// then `./schemas`.
pub fn resolve_schema_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(schema_dir_from(
        explicit,
        std::env::var_os(SCHEMA_DIR_ENV),
        &cwd,
    ))
}

fn schema_dir_from(explicit: Option<&Path>, env: Option<OsString>, cwd: &Path) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    find_store_upwards(cwd).unwrap_or_else(|| cwd.join("schemas"))
}

/// Walk up from `start` to the first directory containing `schemas/`.
fn find_store_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("schemas"))
        .find(|candidate| candidate.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = schema_dir_from(
            Some(Path::new("/srv/raven/schemas")),
            Some(OsString::from("/from/env")),
            dir.path(),
        );
        assert_eq!(resolved, PathBuf::from("/srv/raven/schemas"));
    }

    #[test]
    fn env_beats_discovery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("schemas")).unwrap();
        let resolved = schema_dir_from(None, Some(OsString::from("/from/env")), dir.path());
        assert_eq!(resolved, PathBuf::from("/from/env"));
    }

    #[test]
    fn empty_env_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("schemas")).unwrap();
        let resolved = schema_dir_from(None, Some(OsString::new()), dir.path());
        assert_eq!(resolved, dir.path().join("schemas"));
    }

    #[test]
    fn walks_up_to_nearest_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("schemas")).unwrap();
        let nested = dir.path().join("data").join("surveys");
        std::fs::create_dir_all(&nested).unwrap();

        let resolved = schema_dir_from(None, None, &nested);
        assert_eq!(resolved, dir.path().join("schemas"));
    }

    #[test]
    fn falls_back_to_local_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("empty");
        std::fs::create_dir(&nested).unwrap();

        // An ancestor outside the tempdir may itself hold a `schemas/`.
        let resolved = schema_dir_from(None, None, &nested);
        if find_store_upwards(&nested).is_none() {
            assert_eq!(resolved, nested.join("schemas"));
        }
    }
}
