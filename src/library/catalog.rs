//! Catalog owning every registered document.
//!
//! The catalog is shared as `Arc<Catalog>` between threads. Writers take an
//! exclusive lock; readers take a shared lock and leave with their own copy,
//! so a returned snapshot never changes after the call.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use super::error::{CatalogError, Result};
use super::grouped::GroupedIndex;
use crate::domain::{Document, DocumentId};

/// Insertion-ordered registry of documents
#[derive(Debug, Default)]
pub struct Catalog {
    state: RwLock<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    documents: Vec<Arc<Document>>,
    ids: HashSet<DocumentId>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-filled with `docs`, in order
    pub fn with_documents(docs: impl IntoIterator<Item = Document>) -> Result<Self> {
        let catalog = Self::new();
        for doc in docs {
            catalog.add(doc)?;
        }
        Ok(catalog)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }

    /// Register a document, returning the shared handle the catalog keeps.
    ///
    /// Fails with [`CatalogError::Duplicate`] if the same identity is present.
    pub fn add(&self, doc: impl Into<Arc<Document>>) -> Result<Arc<Document>> {
        let doc = doc.into();
        let mut state = self.write()?;

        if !state.ids.insert(doc.id()) {
            warn!(id = %doc.id(), title = doc.title(), "Rejected duplicate document");
            return Err(CatalogError::Duplicate(doc.id()));
        }
        state.documents.push(Arc::clone(&doc));

        info!(id = %doc.id(), title = doc.title(), "Added document");
        Ok(doc)
    }

    /// Remove a document by identity
    pub fn remove(&self, id: DocumentId) -> Result<Arc<Document>> {
        let mut state = self.write()?;

        if !state.ids.remove(&id) {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        let pos = state
            .documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let doc = state.documents.remove(pos);

        info!(id = %id, title = doc.title(), "Removed document");
        Ok(doc)
    }

    /// Get a document by identity
    pub fn get(&self, id: DocumentId) -> Result<Option<Arc<Document>>> {
        let state = self.read()?;
        Ok(state.documents.iter().find(|d| d.id() == id).cloned())
    }

    /// Check whether a document identity is registered
    pub fn contains(&self, id: DocumentId) -> Result<bool> {
        Ok(self.read()?.ids.contains(&id))
    }

    /// Snapshot of all documents in insertion order
    pub fn all(&self) -> Result<Vec<Arc<Document>>> {
        Ok(self.read()?.documents.clone())
    }

    /// Snapshot of all titles in insertion order
    pub fn titles(&self) -> Result<Vec<String>> {
        let state = self.read()?;
        Ok(state.documents.iter().map(|d| d.title().to_string()).collect())
    }

    /// Documents matching `predicate`, in insertion order.
    ///
    /// The predicate runs against a snapshot, outside the lock, so it may
    /// itself call back into the catalog.
    pub fn search<F>(&self, predicate: F) -> Result<Vec<Arc<Document>>>
    where
        F: Fn(&Document) -> bool,
    {
        let snapshot = self.all()?;
        Ok(snapshot.into_iter().filter(|d| predicate(d)).collect())
    }

    /// First document whose title matches exactly
    pub fn find_by_title(&self, title: &str) -> Result<Arc<Document>> {
        self.search(|d| d.title() == title)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))
    }

    /// Group all documents by `key` in a single pass
    pub fn group_by<F>(&self, key: F) -> Result<GroupedIndex>
    where
        F: Fn(&Document) -> String,
    {
        let snapshot = self.all()?;
        let mut index = GroupedIndex::new();
        for doc in snapshot {
            index.put(key(&doc), doc);
        }
        Ok(index)
    }

    /// Get the number of documents
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.documents.len())
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.documents.is_empty())
    }

    /// Poison the lock by panicking while holding it
    #[cfg(test)]
    pub(crate) fn poison(self: &Arc<Self>) {
        let catalog = Arc::clone(self);
        let _ = std::thread::spawn(move || {
            let _guard = catalog.state.write().unwrap();
            panic!("poisoning catalog lock");
        })
        .join();
    }

    /// Run `f` while holding the write lock
    #[cfg(test)]
    pub(crate) fn with_write_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.state.write().unwrap();
        f()
    }
}
