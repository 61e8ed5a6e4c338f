//! In-memory reference backend
//!
//! [`MemoryRemote`] implements the full [`RemoteStore`] contract against
//! process-local tables: merge-upserts, field patches, whole-document
//! deletes, and full-snapshot fan-out to every matching subscription.
//!
//! Two delivery modes:
//! - **auto** ([`MemoryRemote::new`]): every change is applied and
//!   broadcast synchronously, and writes are acknowledged immediately —
//!   the happy-path backend.
//! - **manual** ([`MemoryRemote::manual`]): snapshot deliveries queue
//!   until [`pump`](MemoryRemote::pump) and submitted writes queue until
//!   [`complete_next_write`](MemoryRemote::complete_next_write), so tests
//!   can interleave stale snapshots, acknowledgments and failures in any
//!   order the real world could produce.
//!
//! Callbacks are always invoked with no internal lock held, so a sink or
//! completion is free to call back into the backend.

use crate::remote::{
    FeedEvent, Query, RemoteStore, RemoteSubscription, SnapshotSink, WriteCompletion, WriteOp,
};
use fleetsync_core::{Collection, DocId, Document, Error, Result};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

type Table = IndexMap<DocId, Document>;
type Delivery = (SnapshotSink, Vec<Document>);

struct SubEntry {
    id: u64,
    query: Query,
    sink: SnapshotSink,
    active: bool,
}

struct QueuedWrite {
    op: WriteOp,
    done: WriteCompletion,
}

#[derive(Default)]
struct RemoteInner {
    tables: HashMap<Collection, Table>,
    subs: Vec<SubEntry>,
    manual: bool,
    queued_writes: VecDeque<QueuedWrite>,
    pending_deliveries: Vec<u64>,
    fail_next_write: Option<Error>,
    fail_next_subscribe: Option<Error>,
    next_sub_id: u64,
}

/// In-memory [`RemoteStore`] with controllable delivery.
pub struct MemoryRemote {
    inner: Arc<Mutex<RemoteInner>>,
}

impl MemoryRemote {
    /// Auto-delivering backend: changes broadcast and acknowledge
    /// synchronously.
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryRemote {
            inner: Arc::new(Mutex::new(RemoteInner::default())),
        })
    }

    /// Manually-pumped backend for deterministic interleaving tests.
    pub fn manual() -> Arc<Self> {
        Arc::new(MemoryRemote {
            inner: Arc::new(Mutex::new(RemoteInner {
                manual: true,
                ..RemoteInner::default()
            })),
        })
    }

    /// Install documents without notifying anyone. Setup helper for
    /// content that predates every subscription.
    pub fn seed(&self, collection: Collection, docs: Vec<Document>) {
        let mut inner = self.inner.lock();
        let table = inner.tables.entry(collection).or_default();
        for doc in docs {
            table.insert(doc.id().clone(), doc);
        }
    }

    /// Current backend contents of a collection, in insertion order.
    pub fn table(&self, collection: Collection) -> Vec<Document> {
        let inner = self.inner.lock();
        inner
            .tables
            .get(&collection)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of writes submitted but not yet completed (manual mode).
    pub fn queued_writes(&self) -> usize {
        self.inner.lock().queued_writes.len()
    }

    /// Make the next `subscribe` call fail with `err`.
    pub fn fail_next_subscribe(&self, err: Error) {
        self.inner.lock().fail_next_subscribe = Some(err);
    }

    /// Make the next submitted write complete with `err` without being
    /// applied (auto mode; in manual mode pass the error to
    /// [`complete_next_write`](Self::complete_next_write) instead).
    pub fn fail_next_write(&self, err: Error) {
        self.inner.lock().fail_next_write = Some(err);
    }

    /// Deliver every queued snapshot (manual mode).
    pub fn pump(&self) {
        let deliveries = {
            let mut inner = self.inner.lock();
            let ids = std::mem::take(&mut inner.pending_deliveries);
            ids.iter()
                .filter_map(|id| {
                    inner
                        .subs
                        .iter()
                        .find(|s| s.id == *id && s.active)
                        .map(|s| (s.sink.clone(), snapshot_for(&inner.tables, &s.query)))
                })
                .collect::<Vec<Delivery>>()
        };
        deliver(deliveries);
    }

    /// Redeliver the current result set to every subscriber of
    /// `collection`, immediately, even in manual mode.
    ///
    /// With writes still queued this reproduces the stale-snapshot race:
    /// the delivered content predates the pending write.
    pub fn broadcast(&self, collection: Collection) {
        let deliveries = {
            let inner = self.inner.lock();
            deliveries_for(&inner, collection)
        };
        deliver(deliveries);
    }

    /// Resolve the oldest queued write (manual mode).
    ///
    /// On `Ok` the write is applied and its snapshots broadcast before the
    /// completion fires — the backend commits, fans out, then
    /// acknowledges the writer. On `Err` the write is discarded and the
    /// completion fires with the error. Returns false when nothing was
    /// queued.
    pub fn complete_next_write(&self, result: Result<()>) -> bool {
        let (done, outcome, deliveries) = {
            let mut inner = self.inner.lock();
            let Some(write) = inner.queued_writes.pop_front() else {
                return false;
            };
            match result {
                Ok(()) => match apply(&mut inner, write.op) {
                    Ok(collection) => {
                        let deliveries = deliveries_for(&inner, collection);
                        (write.done, Ok(()), deliveries)
                    }
                    Err(err) => (write.done, Err(err), Vec::new()),
                },
                Err(err) => (write.done, Err(err), Vec::new()),
            }
        };
        deliver(deliveries);
        done(outcome);
        true
    }
}

impl RemoteStore for MemoryRemote {
    fn subscribe(&self, query: Query, sink: SnapshotSink) -> Result<RemoteSubscription> {
        let (id, initial) = {
            let mut inner = self.inner.lock();
            if let Some(err) = inner.fail_next_subscribe.take() {
                return Err(err);
            }
            inner.next_sub_id += 1;
            let id = inner.next_sub_id;
            inner.subs.push(SubEntry {
                id,
                query: query.clone(),
                sink: sink.clone(),
                active: true,
            });
            debug!(collection = %query.collection, sub = id, "subscription attached");
            if inner.manual {
                inner.pending_deliveries.push(id);
                (id, None)
            } else {
                (id, Some(snapshot_for(&inner.tables, &query)))
            }
        };

        if let Some(docs) = initial {
            sink(FeedEvent::Snapshot(docs));
        }

        let handle_inner = Arc::clone(&self.inner);
        Ok(RemoteSubscription::new(Box::new(move || {
            let mut inner = handle_inner.lock();
            if let Some(sub) = inner.subs.iter_mut().find(|s| s.id == id) {
                sub.active = false;
            }
        })))
    }

    fn submit(&self, op: WriteOp, done: WriteCompletion) {
        let (outcome, deliveries) = {
            let mut inner = self.inner.lock();
            if let Some(err) = inner.fail_next_write.take() {
                (Err(err), Vec::new())
            } else if inner.manual {
                inner.queued_writes.push_back(QueuedWrite { op, done });
                return;
            } else {
                match apply(&mut inner, op) {
                    Ok(collection) => {
                        let deliveries = deliveries_for(&inner, collection);
                        (Ok(()), deliveries)
                    }
                    Err(err) => (Err(err), Vec::new()),
                }
            }
        };
        deliver(deliveries);
        done(outcome);
    }
}

/// Apply a write to the tables, returning the affected collection.
fn apply(inner: &mut RemoteInner, op: WriteOp) -> Result<Collection> {
    let collection = op.collection();
    let table = inner.tables.entry(collection).or_default();
    match op {
        WriteOp::Upsert { doc, .. } => match table.get_mut(doc.id()) {
            // Merge semantics: independent call sites writing different
            // subsets of the same document must not clobber each other.
            Some(existing) => existing.merge_from(doc.body()),
            None => {
                table.insert(doc.id().clone(), doc);
            }
        },
        WriteOp::Patch { id, fields, .. } => match table.get_mut(&id) {
            Some(existing) => existing.merge_from(&fields),
            None => return Err(Error::NotFound { collection, id }),
        },
        WriteOp::Delete { id, .. } => {
            table.shift_remove(&id);
        }
    }
    Ok(collection)
}

fn snapshot_for(tables: &HashMap<Collection, Table>, query: &Query) -> Vec<Document> {
    tables
        .get(&query.collection)
        .map(|table| {
            table
                .values()
                .filter(|doc| query.matches(doc))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn deliveries_for(inner: &RemoteInner, collection: Collection) -> Vec<Delivery> {
    inner
        .subs
        .iter()
        .filter(|s| s.active && s.query.collection == collection)
        .map(|s| (s.sink.clone(), snapshot_for(&inner.tables, &s.query)))
        .collect()
}

fn deliver(deliveries: Vec<Delivery>) {
    for (sink, docs) in deliveries {
        sink(FeedEvent::Snapshot(docs));
    }
}
