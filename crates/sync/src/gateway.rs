//! Whole-document merge writes
//!
//! The gateway is the only way data leaves the client. Every mutation:
//! 1. stamps `updatedAt` (callers never set it),
//! 2. applies optimistically through the reconciler (merge against the
//!    currently presented state),
//! 3. submits to the backend with a completion that resolves or rolls
//!    back the pending edit — at most once, no retry, no queueing.
//!
//! The gateway has no concept of nested paths: nested removals are parent
//! rewrites produced by the editor before they get here. Two concurrent
//! patches to different fields of one document both land (merge
//! semantics); two writes of the same field race under last-writer-wins.

use crate::reconciler::Reconciler;
use fleetsync_core::document::UPDATED_AT;
use fleetsync_core::{now_millis, Collection, DocId, Document, Fields, Result};
use fleetsync_store::{RemoteStore, WriteCompletion, WriteOp};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Change notification hook invoked after every visible state transition
/// (optimistic application, acknowledgment, rollback).
pub type ChangeHook = Arc<dyn Fn() + Send + Sync>;

/// Mutation entry point for one collection.
pub struct MutationGateway {
    remote: Arc<dyn RemoteStore>,
    collection: Collection,
    reconciler: Arc<Reconciler>,
    alive: Arc<AtomicBool>,
    changed: ChangeHook,
}

impl MutationGateway {
    /// Build a gateway bound to a collection and its reconciler.
    ///
    /// `alive` is the owning session's liveness flag: completions that
    /// resolve after teardown are discarded instead of touching state.
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        collection: Collection,
        reconciler: Arc<Reconciler>,
        alive: Arc<AtomicBool>,
        changed: ChangeHook,
    ) -> Self {
        MutationGateway {
            remote,
            collection,
            reconciler,
            alive,
            changed,
        }
    }

    /// Idempotent merge-upsert of a whole document.
    ///
    /// Fields not present in `doc` are preserved both locally (the
    /// optimistic state merges into the currently presented version) and
    /// at the backend. Returns the write sequence.
    pub fn create(&self, mut doc: Document) -> Result<u64> {
        doc.set_updated_at(now_millis());
        let optimistic = match self.reconciler.get(doc.id()) {
            Some(current) => current.merged(doc.body()),
            None => doc.clone(),
        };
        let seq = self.reconciler.stage(doc.id().clone(), Some(optimistic));
        (self.changed)();
        debug!(collection = %self.collection, id = %doc.id(), seq, "upsert submitted");
        let done = self.completion(doc.id().clone(), seq);
        self.remote.submit(
            WriteOp::Upsert {
                collection: self.collection,
                doc,
            },
            done,
        );
        Ok(seq)
    }

    /// Merge-write of only the named fields.
    ///
    /// Nothing outside `fields` is touched. If the document is unknown
    /// locally the patch is still submitted (the backend may upsert or
    /// reject with not-found); the optimistic state is then just the
    /// patched fields.
    pub fn patch(&self, id: &DocId, mut fields: Fields) -> Result<u64> {
        fields.insert(UPDATED_AT.to_string(), Value::from(now_millis()));
        let optimistic = match self.reconciler.get(id) {
            Some(current) => current.merged(&fields),
            None => Document::new(id.clone(), fields.clone()),
        };
        let seq = self.reconciler.stage(id.clone(), Some(optimistic));
        (self.changed)();
        debug!(collection = %self.collection, %id, seq, "patch submitted");
        let done = self.completion(id.clone(), seq);
        self.remote.submit(
            WriteOp::Patch {
                collection: self.collection,
                id: id.clone(),
                fields,
            },
            done,
        );
        Ok(seq)
    }

    /// Whole-document delete. For nested containment, callers patch the
    /// parent with the child removed instead.
    pub fn remove(&self, id: &DocId) -> Result<u64> {
        let seq = self.reconciler.stage(id.clone(), None);
        (self.changed)();
        debug!(collection = %self.collection, %id, seq, "delete submitted");
        let done = self.completion(id.clone(), seq);
        self.remote.submit(
            WriteOp::Delete {
                collection: self.collection,
                id: id.clone(),
            },
            done,
        );
        Ok(seq)
    }

    fn completion(&self, id: DocId, seq: u64) -> WriteCompletion {
        let reconciler = Arc::clone(&self.reconciler);
        let alive = Arc::clone(&self.alive);
        let changed = Arc::clone(&self.changed);
        Box::new(move |result| {
            if !alive.load(Ordering::SeqCst) {
                debug!(%id, seq, "completion after teardown discarded");
                return;
            }
            reconciler.resolve(&id, seq, result);
            changed();
        })
    }
}

impl std::fmt::Debug for MutationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationGateway")
            .field("collection", &self.collection)
            .finish()
    }
}
