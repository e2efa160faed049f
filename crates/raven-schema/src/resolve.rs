//! # Multi-Version Resolution
//!
//! Answers "which of these versions does this document satisfy?".
//!
//! Every requested version is attempted, in request order, even after a
//! match: callers need the full set of matching versions, and a document
//! may satisfy several versions at once.
//!
//! ## Aggregation
//!
//! - At least one version valid: `Ok(matched)`, in attempt order. Failed
//!   versions are dropped from the answer.
//! - No version valid: [`SchemaError::ValidationFailure`] carrying each
//!   version's violations.
//! - Empty request: [`SchemaError::NoVersionsRequested`]. Never success.
//!
//! A version with no schema document ([`SchemaError::SchemaNotFound`]) or
//! an unusable one ([`SchemaError::InvalidSchema`]) aborts the resolution.
//! That is a wrong request or a broken store, and is never reported as
//! "the document failed validation".

use std::path::PathBuf;

use raven_core::{SchemaName, Version};
use serde_json::Value;

use crate::error::{SchemaError, VersionFailure, VersionFailures};
use crate::evaluator::{Evaluator, JsonSchemaEvaluator};
use crate::registry::SchemaRegistry;
use crate::store::SchemaStore;
use crate::validate::{SchemaValidator, ValidationOutcome};

/// Which versions a resolution should try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelection {
    /// Every version the registry knows for the family, ascending.
    All,
    /// Exactly these version strings, in this order.
    Listed(Vec<String>),
}

impl VersionSelection {
    /// Command-line convention: no versions given means all of them.
    pub fn from_args(versions: Vec<String>) -> Self {
        if versions.is_empty() {
            Self::All
        } else {
            Self::Listed(versions)
        }
    }
}

/// Resolves documents against several versions of a schema family.
#[derive(Debug)]
pub struct Resolver<E = JsonSchemaEvaluator> {
    registry: SchemaRegistry,
    validator: SchemaValidator<E>,
}

impl Resolver {
    /// Create a resolver over the store at `root`, using the `jsonschema` evaluator.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_evaluator(SchemaStore::new(root), JsonSchemaEvaluator)
    }
}

impl<E: Evaluator> Resolver<E> {
    pub fn with_evaluator(store: SchemaStore, evaluator: E) -> Self {
        Self {
            registry: SchemaRegistry::from_store(store.clone()),
            validator: SchemaValidator::with_evaluator(store, evaluator),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &SchemaValidator<E> {
        &self.validator
    }

    /// Resolve `document` against the selected versions of `schema_name`.
    ///
    /// Returns the versions that validated, in the order they were tried.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::NoVersionsRequested`] for an empty selection.
    /// - [`SchemaError::MalformedVersion`] if any listed version is
    ///   malformed; checked for all of them before any schema is loaded.
    /// - [`SchemaError::SchemaNotFound`] / [`SchemaError::InvalidSchema`]
    ///   from the first version whose schema cannot be used.
    /// - [`SchemaError::ValidationFailure`] when no version validated.
    /// - Registry scan errors when `selection` is [`VersionSelection::All`].
    pub fn resolve(
        &self,
        document: &Value,
        schema_name: &SchemaName,
        selection: &VersionSelection,
    ) -> Result<Vec<Version>, SchemaError> {
        let versions = match selection {
            VersionSelection::All => self.registry.list_known_versions(schema_name)?,
            VersionSelection::Listed(listed) => listed
                .iter()
                .map(|v| Version::parse(v))
                .collect::<Result<Vec<_>, _>>()?,
        };

        if versions.is_empty() {
            return Err(SchemaError::NoVersionsRequested {
                schema_name: schema_name.clone(),
            });
        }

        let mut matched = Vec::new();
        let mut failures = Vec::new();

        for version in versions {
            match self.validator.validate_version(document, schema_name, &version)? {
                ValidationOutcome::Valid => matched.push(version),
                ValidationOutcome::Invalid(violations) => {
                    failures.push(VersionFailure { version, violations });
                }
            }
        }

        tracing::info!(
            schema = %schema_name,
            matched = matched.len(),
            failed = failures.len(),
            "resolved document against schema versions"
        );

        if !matched.is_empty() {
            return Ok(matched);
        }

        if failures.is_empty() {
            unreachable!("resolution of {schema_name} attempted no versions");
        }

        Err(SchemaError::ValidationFailure {
            schema_name: schema_name.clone(),
            failures: VersionFailures::new(failures),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{SchemaRejected, Violation};
    use serde_json::json;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn name() -> SchemaName {
        SchemaName::new("modeling_input").unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn listed(versions: &[&str]) -> VersionSelection {
        VersionSelection::Listed(versions.iter().map(|s| s.to_string()).collect())
    }

    fn write_schema(dir: &Path, fragment: &str, schema: Value) {
        std::fs::write(
            dir.join(format!("modeling_input_{fragment}_schema.json")),
            serde_json::to_string_pretty(&schema).unwrap(),
        )
        .unwrap();
    }

    /// 1.0.0 needs `survey`; 1.0.1 also accepts it; 1.1.0 additionally
    /// requires `input_schema_version`.
    fn three_version_store() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let survey = json!({
            "type": "object",
            "required": ["survey"],
            "properties": { "survey": { "type": "object" } }
        });
        write_schema(dir.path(), "1_0_0", survey.clone());
        write_schema(dir.path(), "1_0_1", survey);
        write_schema(
            dir.path(),
            "1_1_0",
            json!({
                "type": "object",
                "required": ["survey", "input_schema_version"],
                "properties": {
                    "survey": { "type": "object" },
                    "input_schema_version": { "const": "1.1.0" }
                }
            }),
        );
        dir
    }

    #[test]
    fn reports_every_matching_version() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let matched = resolver
            .resolve(&json!({"survey": {}}), &name(), &listed(&["1.0.0", "1.0.1"]))
            .unwrap();
        assert_eq!(matched, [v("1.0.0"), v("1.0.1")]);
    }

    #[test]
    fn reporting_order_follows_request_order() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let doc = json!({"survey": {}});

        let forward = resolver
            .resolve(&doc, &name(), &listed(&["1.0.0", "1.0.1"]))
            .unwrap();
        let backward = resolver
            .resolve(&doc, &name(), &listed(&["1.0.1", "1.0.0"]))
            .unwrap();
        assert_eq!(backward, [v("1.0.1"), v("1.0.0")]);

        let mut a = forward.clone();
        let mut b = backward.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn success_even_when_other_versions_fail() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let matched = resolver
            .resolve(&json!({"survey": {}}), &name(), &listed(&["1.1.0", "1.0.0"]))
            .unwrap();
        assert_eq!(matched, [v("1.0.0")]);
    }

    #[test]
    fn all_selection_uses_registry_order() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let matched = resolver
            .resolve(
                &json!({"survey": {}, "input_schema_version": "1.1.0"}),
                &name(),
                &VersionSelection::All,
            )
            .unwrap();
        assert_eq!(matched, [v("1.0.0"), v("1.0.1"), v("1.1.0")]);
    }

    #[test]
    fn empty_list_is_rejected() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let err = resolver
            .resolve(&json!({"survey": {}}), &name(), &VersionSelection::Listed(vec![]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::NoVersionsRequested { .. }), "got {err}");
    }

    #[test]
    fn all_for_unknown_family_is_no_versions() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let err = resolver
            .resolve(
                &json!({}),
                &SchemaName::new("unknown_family").unwrap(),
                &VersionSelection::All,
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::NoVersionsRequested { .. }));
    }

    #[test]
    fn missing_schema_aborts_even_if_others_match() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let err = resolver
            .resolve(
                &json!({"survey": {}}),
                &name(),
                &listed(&["1.0.0", "9.9.9", "1.0.1"]),
            )
            .unwrap_err();
        match err {
            SchemaError::SchemaNotFound { version, .. } => assert_eq!(version, v("9.9.9")),
            other => panic!("expected SchemaNotFound, got {other}"),
        }
    }

    #[test]
    fn malformed_version_aborts_before_loading() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let err = resolver
            .resolve(&json!({"survey": {}}), &name(), &listed(&["9.9.9", "1_0_0"]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedVersion(_)), "got {err}");
    }

    #[test]
    fn all_failing_versions_are_reported() {
        let dir = three_version_store();
        let resolver = Resolver::new(dir.path());
        let err = resolver
            .resolve(&json!({"invalid": "data"}), &name(), &listed(&["1.0.0", "1.1.0"]))
            .unwrap_err();

        match &err {
            SchemaError::ValidationFailure { schema_name, failures } => {
                assert_eq!(schema_name, &name());
                assert_eq!(failures.versions(), [v("1.0.0"), v("1.1.0")]);
                assert_eq!(failures.failures()[0].violations.len(), 1);
                assert_eq!(failures.failures()[1].violations.len(), 2);
            }
            other => panic!("expected ValidationFailure, got {other}"),
        }

        let text = err.to_string();
        assert!(text.starts_with("errors validating modeling_input:"));
        assert!(text.contains("version 1.0.0:"));
        assert!(text.contains("version 1.1.0:"));
    }

    /// Counts calls and accepts everything.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Evaluator for Counting {
        fn evaluate(
            &self,
            _schema: &Value,
            _instance: &Value,
        ) -> Result<Vec<Violation>, SchemaRejected> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[test]
    fn no_short_circuit_after_first_match() {
        let dir = three_version_store();
        let resolver = Resolver::with_evaluator(SchemaStore::new(dir.path()), Counting::default());
        let matched = resolver
            .resolve(&json!({}), &name(), &listed(&["1.0.0", "1.0.1", "1.1.0"]))
            .unwrap();
        assert_eq!(matched.len(), 3);
        assert_eq!(resolver.validator().evaluator().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn duplicate_requests_are_each_attempted() {
        let dir = three_version_store();
        let resolver = Resolver::with_evaluator(SchemaStore::new(dir.path()), Counting::default());
        let matched = resolver
            .resolve(&json!({}), &name(), &listed(&["1.0.0", "1.0.0"]))
            .unwrap();
        assert_eq!(matched, [v("1.0.0"), v("1.0.0")]);
    }

    #[test]
    fn from_args_maps_empty_to_all() {
        assert_eq!(VersionSelection::from_args(vec![]), VersionSelection::All);
        assert_eq!(
            VersionSelection::from_args(vec!["1.0.0".to_string()]),
            listed(&["1.0.0"])
        );
    }
}
