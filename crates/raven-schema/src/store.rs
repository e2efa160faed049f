//! # Schema Store
//!
//! On-disk layout of a schema store: one flat directory whose every entry
//! is a schema file or a sample file named per [`raven_core::naming`].
//!
//! ```text
//! schemas/
//!   modeling_input_1_0_0_schema.json
//!   modeling_input_1_0_0_sample_valid.json
//!   modeling_input_1_0_0_sample_invalid_missing_survey.json
//!   modeling_input_1_0_1_schema.json
//!   ...
//! ```
//!
//! Listing is fail-fast: an entry that matches neither pattern aborts the
//! scan with [`SchemaError::UnrecognizedName`] rather than being skipped,
//! so typos and stray files surface immediately.

use std::path::{Path, PathBuf};

use raven_core::{parse_name, schema_file_name, SchemaName, StoreEntry, Version};
use serde_json::Value;

use crate::error::SchemaError;

/// A schema store rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the schema document for `(name, version)`. The file may not exist.
    pub fn schema_path(&self, schema_name: &SchemaName, version: &Version) -> PathBuf {
        self.root.join(schema_file_name(schema_name, version))
    }

    /// List and decode every entry in the store, sorted by file name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::StoreUnreadable`] if the root cannot be listed,
    /// [`SchemaError::UnrecognizedName`] on the first entry that breaks
    /// the naming grammar.
    pub fn entries(&self) -> Result<Vec<(PathBuf, StoreEntry)>, SchemaError> {
        let unreadable = |e: std::io::Error| SchemaError::StoreUnreadable {
            path: self.root.display().to_string(),
            reason: e.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unreadable)? {
            paths.push(entry.map_err(unreadable)?.path());
        }
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let entry = parse_name(&path)?;
            entries.push((path, entry));
        }
        Ok(entries)
    }

    /// Load and parse the schema document for `(name, version)`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::SchemaNotFound`] for any failure: missing file,
    /// unreadable file or malformed JSON.
    pub fn load_schema(
        &self,
        schema_name: &SchemaName,
        version: &Version,
    ) -> Result<Value, SchemaError> {
        let path = self.schema_path(schema_name, version);
        let not_found = |reason: String| SchemaError::SchemaNotFound {
            schema_name: schema_name.clone(),
            version: *version,
            reason,
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| not_found(format!("cannot read {}: {e}", path.display())))?;

        serde_json::from_str(&content)
            .map_err(|e| not_found(format!("invalid JSON in {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> SchemaName {
        SchemaName::new("modeling_input").unwrap()
    }

    #[test]
    fn schema_path_uses_underscore_encoding() {
        let store = SchemaStore::new("/srv/schemas");
        assert_eq!(
            store.schema_path(&name(), &Version::new(1, 2, 3)),
            PathBuf::from("/srv/schemas/modeling_input_1_2_3_schema.json")
        );
    }

    #[test]
    fn entries_are_sorted_and_decoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modeling_input_1_0_1_schema.json"), "{}").unwrap();
        std::fs::write(dir.path().join("modeling_input_1_0_0_sample_valid.json"), "{}").unwrap();
        std::fs::write(dir.path().join("modeling_input_1_0_0_schema.json"), "{}").unwrap();

        let store = SchemaStore::new(dir.path());
        let entries = store.entries().unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "modeling_input_1_0_0_sample_valid.json",
                "modeling_input_1_0_0_schema.json",
                "modeling_input_1_0_1_schema.json",
            ]
        );
        assert!(!entries[0].1.is_schema());
        assert!(entries[1].1.is_schema());
    }

    #[test]
    fn stray_file_fails_the_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modeling_input_1_0_0_schema.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "todo").unwrap();

        let err = SchemaStore::new(dir.path()).entries().unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedName(_)), "got {err}");
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn subdirectories_must_also_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("modeling_input")).unwrap();
        let err = SchemaStore::new(dir.path()).entries().unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedName(_)));
    }

    #[test]
    fn missing_root_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaStore::new(dir.path().join("absent")).entries().unwrap_err();
        assert!(matches!(err, SchemaError::StoreUnreadable { .. }));
    }

    #[test]
    fn load_schema_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaStore::new(dir.path())
            .load_schema(&name(), &Version::new(9, 9, 9))
            .unwrap_err();
        assert!(matches!(err, SchemaError::SchemaNotFound { .. }));
    }

    #[test]
    fn load_schema_malformed_json_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modeling_input_1_0_0_schema.json"), "{ not json").unwrap();
        let err = SchemaStore::new(dir.path())
            .load_schema(&name(), &Version::new(1, 0, 0))
            .unwrap_err();
        match err {
            SchemaError::SchemaNotFound { version, reason, .. } => {
                assert_eq!(version, Version::new(1, 0, 0));
                assert!(reason.contains("invalid JSON"));
            }
            other => panic!("expected SchemaNotFound, got {other}"),
        }
    }

    #[test]
    fn load_schema_parses_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("modeling_input_1_0_0_schema.json"),
            r#"{"type": "object"}"#,
        )
        .unwrap();
        let schema = SchemaStore::new(dir.path())
            .load_schema(&name(), &Version::new(1, 0, 0))
            .unwrap();
        assert_eq!(schema["type"], "object");
    }
}
