//! Multi-map of documents grouped under a string key.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::Document;

/// Documents grouped by key, each group in insertion order.
///
/// Looking up a key that was never inserted yields an empty slice.
#[derive(Debug, Clone, Default)]
pub struct GroupedIndex {
    groups: BTreeMap<String, Vec<Arc<Document>>>,
}

impl GroupedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document to the group for `key`
    pub fn put(&mut self, key: impl Into<String>, doc: Arc<Document>) {
        self.groups.entry(key.into()).or_default().push(doc);
    }

    /// Documents under `key`, empty when the key is absent
    pub fn get(&self, key: &str) -> &[Arc<Document>] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Iterate over `(key, documents)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<Document>])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of documents across all groups
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
