//! Local-vs-remote arbitration
//!
//! The classic failure this layer rules out: an optimistic edit is applied
//! locally, the write is in flight, and a snapshot that predates the write
//! arrives — naively adopting it would visually revert the edit, which
//! then reappears when the write's own snapshot lands (flicker), or is
//! lost entirely if the user navigates away.
//!
//! The rule: per document, at most one pending local version. While a
//! pending version exists, reads present it instead of the baseline. A
//! completion clears the pending marker only when it belongs to the
//! newest write for that document — a superseded write's acknowledgment
//! must not expose an older state.

use fleetsync_core::{DocId, Document, Error, Result};
use fleetsync_store::DocumentStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Optimistic local version of one document, awaiting acknowledgment.
#[derive(Debug, Clone)]
struct PendingEdit {
    /// The locally-applied state; `None` marks a pending delete.
    doc: Option<Document>,
    /// Sequence of the newest write that produced this state.
    seq: u64,
}

/// Arbitrates pending local edits against the snapshot baseline.
pub struct Reconciler {
    store: Arc<DocumentStore>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    pending: HashMap<DocId, PendingEdit>,
    next_seq: u64,
    last_write_error: Option<Error>,
}

impl Reconciler {
    /// Wrap a store as the authoritative baseline.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Reconciler {
            store,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The underlying baseline store.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Adopt an inbound snapshot as the new baseline.
    ///
    /// Documents with a pending edit keep presenting the pending version
    /// regardless of what the snapshot says; everything else is taken
    /// verbatim. Returns whether the baseline actually changed.
    pub fn apply_snapshot(&self, docs: Vec<Document>) -> bool {
        self.store.replace_all(docs)
    }

    /// Record an optimistic local version for a document and reserve the
    /// write sequence for the mutation that produced it.
    ///
    /// A second edit before the first resolves supersedes the pending
    /// marker — last edit wins locally — while both writes still travel
    /// to the backend in issuance order.
    pub fn stage(&self, id: DocId, doc: Option<Document>) -> u64 {
        let mut inner = self.inner.lock();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        debug!(%id, seq, delete = doc.is_none(), "staged optimistic edit");
        inner.pending.insert(id, PendingEdit { doc, seq });
        seq
    }

    /// Resolve the write with sequence `seq` for document `id`.
    ///
    /// Success clears the pending marker (the next snapshot is adopted);
    /// failure clears it and reverts to the baseline, retaining the error
    /// for the session to surface. Either way, a completion for a
    /// superseded write leaves the newer pending edit in place.
    pub fn resolve(&self, id: &DocId, seq: u64, result: Result<()>) {
        let mut inner = self.inner.lock();
        let current = inner.pending.get(id).map(|p| p.seq);
        match result {
            Ok(()) => {
                if current == Some(seq) {
                    inner.pending.remove(id);
                    debug!(%id, seq, "write acknowledged, pending cleared");
                } else {
                    debug!(%id, seq, ?current, "superseded write acknowledged, pending kept");
                }
            }
            Err(err) => {
                if current == Some(seq) {
                    inner.pending.remove(id);
                    warn!(%id, seq, error = %err, "write failed, reverted to baseline");
                } else {
                    warn!(%id, seq, error = %err, "superseded write failed");
                }
                inner.last_write_error = Some(err);
            }
        }
    }

    /// Presented state of one document: the pending version if any,
    /// otherwise the baseline. `None` means absent (or pending delete).
    pub fn get(&self, id: &DocId) -> Option<Document> {
        let inner = self.inner.lock();
        match inner.pending.get(id) {
            Some(pending) => pending.doc.clone(),
            None => self.store.get(id),
        }
    }

    /// Presented result set: the baseline in snapshot order with pending
    /// versions overlaid, pending deletes removed, and pending creations
    /// not yet in the baseline appended in edit order.
    pub fn records(&self) -> Vec<Document> {
        let inner = self.inner.lock();
        let mut out = Vec::new();
        for doc in self.store.list() {
            match inner.pending.get(doc.id()) {
                Some(PendingEdit { doc: Some(local), .. }) => out.push(local.clone()),
                Some(PendingEdit { doc: None, .. }) => {} // pending delete
                None => out.push(doc),
            }
        }
        let mut creations: Vec<&PendingEdit> = inner
            .pending
            .iter()
            .filter(|(id, p)| p.doc.is_some() && !self.store.contains(id))
            .map(|(_, p)| p)
            .collect();
        creations.sort_by_key(|p| p.seq);
        out.extend(creations.into_iter().filter_map(|p| p.doc.clone()));
        out
    }

    /// Whether a document currently has an unacknowledged local edit.
    pub fn has_pending(&self, id: &DocId) -> bool {
        self.inner.lock().pending.contains_key(id)
    }

    /// Number of documents with unacknowledged local edits.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Drop all pending markers (used on a full resubscribe, when the
    /// filter changes underneath the session).
    pub fn clear_pending(&self) {
        self.inner.lock().pending.clear();
    }

    /// Take the most recent write failure, if one has not been surfaced yet.
    pub fn take_write_error(&self) -> Option<Error> {
        self.inner.lock().last_write_error.take()
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("pending", &self.pending_count())
            .finish()
    }
}
