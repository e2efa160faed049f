//! # Schema Registry
//!
//! Maps each schema family to the versions available in a store.
//!
//! Discovery scans the store once and memoizes the result for the life of
//! the registry; the store is not expected to change while a process runs.
//! The memo holds both the sorted entry list and the index built from it,
//! and sits behind a [`OnceLock`], so concurrent first accesses agree on a
//! single scan. A failed scan is not memoized.
//!
//! Only schema files contribute versions. Sample files must still parse,
//! since the scan fails on any entry that breaks the naming grammar.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;

use raven_core::{SchemaName, StoreEntry, Version};

use crate::error::SchemaError;
use crate::store::SchemaStore;

/// Known schema families and their versions.
///
/// Families are kept in order of first discovery; versions ascend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    families: Vec<(SchemaName, BTreeSet<Version>)>,
}

impl SchemaIndex {
    /// Build an index from decoded store entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a StoreEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries.into_iter().filter(|e| e.is_schema()) {
            index.insert(entry.schema_name.clone(), entry.version);
        }
        index
    }

    fn insert(&mut self, schema_name: SchemaName, version: Version) {
        match self.families.iter_mut().find(|(n, _)| *n == schema_name) {
            Some((_, versions)) => {
                versions.insert(version);
            }
            None => self.families.push((schema_name, BTreeSet::from([version]))),
        }
    }

    /// Family names, in discovery order.
    pub fn schemas(&self) -> impl Iterator<Item = &SchemaName> {
        self.families.iter().map(|(n, _)| n)
    }

    /// Versions of one family, ascending. Empty for an unknown family.
    pub fn versions(&self, schema_name: &SchemaName) -> Vec<Version> {
        self.families
            .iter()
            .find(|(n, _)| n == schema_name)
            .map(|(_, v)| v.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, schema_name: &SchemaName, version: &Version) -> bool {
        self.families
            .iter()
            .any(|(n, v)| n == schema_name && v.contains(version))
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Every family with its ascending versions.
    pub fn iter(&self) -> impl Iterator<Item = (&SchemaName, Vec<Version>)> {
        self.families
            .iter()
            .map(|(n, v)| (n, v.iter().copied().collect()))
    }
}

/// One completed scan of a store.
#[derive(Debug)]
struct Discovery {
    entries: Vec<(PathBuf, StoreEntry)>,
    index: SchemaIndex,
}

/// Registry of the schemas available in one store.
#[derive(Debug)]
pub struct SchemaRegistry {
    store: SchemaStore,
    discovery: OnceLock<Discovery>,
}

impl SchemaRegistry {
    /// Create a registry over the store at `root`. Nothing is read until
    /// the first query.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_store(SchemaStore::new(root))
    }

    pub fn from_store(store: SchemaStore) -> Self {
        Self {
            store,
            discovery: OnceLock::new(),
        }
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    fn discovery(&self) -> Result<&Discovery, SchemaError> {
        if let Some(discovery) = self.discovery.get() {
            return Ok(discovery);
        }

        let entries = self.store.entries()?;
        let index = SchemaIndex::from_entries(entries.iter().map(|(_, e)| e));
        tracing::info!(
            store = %self.store.root().display(),
            entries = entries.len(),
            families = index.families.len(),
            "discovered schema store"
        );

        Ok(self.discovery.get_or_init(|| Discovery { entries, index }))
    }

    /// The memoized index, scanning the store on first use.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnrecognizedName`] or [`SchemaError::StoreUnreadable`]
    /// from the scan.
    pub fn index(&self) -> Result<&SchemaIndex, SchemaError> {
        Ok(&self.discovery()?.index)
    }

    /// Every store entry from the memoized scan, sorted by file name.
    ///
    /// # Errors
    ///
    /// As for [`SchemaRegistry::index`].
    pub fn entries(&self) -> Result<&[(PathBuf, StoreEntry)], SchemaError> {
        Ok(&self.discovery()?.entries)
    }

    /// All known schema families, in discovery order.
    pub fn list_known_schemas(&self) -> Result<Vec<SchemaName>, SchemaError> {
        Ok(self.index()?.schemas().cloned().collect())
    }

    /// All known versions of `schema_name`, ascending. Empty if unknown.
    pub fn list_known_versions(
        &self,
        schema_name: &SchemaName,
    ) -> Result<Vec<Version>, SchemaError> {
        Ok(self.index()?.versions(schema_name))
    }

    /// The full family -> versions mapping.
    pub fn known_schemas_and_versions(
        &self,
    ) -> Result<Vec<(SchemaName, Vec<Version>)>, SchemaError> {
        Ok(self
            .index()?
            .iter()
            .map(|(n, v)| (n.clone(), v))
            .collect())
    }
}
