//! Canonical in-memory contents of one subscription
//!
//! A [`DocumentStore`] holds the authoritative baseline for one
//! (collection, filter) pair: whatever the last snapshot said. Writes
//! never land here directly — the mutation gateway applies optimism in the
//! reconciler layer and the backend's own snapshot eventually replaces the
//! baseline.

use fleetsync_core::{DocId, Document};
use indexmap::IndexMap;
use parking_lot::RwLock;

/// Keyed store for one (collection, filter) pair, in snapshot order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: IndexMap<DocId, Document>,
    revision: u64,
}

impl DocumentStore {
    /// An empty store.
    pub fn new() -> Self {
        DocumentStore::default()
    }

    /// Atomically swap in a full snapshot.
    ///
    /// Returns whether anything actually changed. Structurally identical
    /// content (same ids in the same order, equal documents) leaves the
    /// revision untouched so consumers are not re-notified for redundant
    /// deliveries.
    pub fn replace_all(&self, docs: Vec<Document>) -> bool {
        let mut inner = self.inner.write();
        let unchanged = inner.docs.len() == docs.len()
            && inner
                .docs
                .values()
                .zip(docs.iter())
                .all(|(old, new)| old.id() == new.id() && old == new);
        if unchanged {
            return false;
        }

        inner.docs = docs.into_iter().map(|d| (d.id().clone(), d)).collect();
        inner.revision += 1;
        true
    }

    /// Read one document.
    pub fn get(&self, id: &DocId) -> Option<Document> {
        self.inner.read().docs.get(id).cloned()
    }

    /// The full contents in snapshot order.
    pub fn list(&self) -> Vec<Document> {
        self.inner.read().docs.values().cloned().collect()
    }

    /// Whether a document is present.
    pub fn contains(&self, id: &DocId) -> bool {
        self.inner.read().docs.contains_key(id)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.inner.read().docs.len()
    }

    /// True when no snapshot content is present.
    pub fn is_empty(&self) -> bool {
        self.inner.read().docs.is_empty()
    }

    /// Change counter: bumped exactly when [`replace_all`](Self::replace_all)
    /// swaps in different content.
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }
}
