//! The remote store contract
//!
//! The sync core depends on exactly this surface, not on any backend's API
//! shape: per collection, (a) subscribe(filter) delivering full snapshots,
//! (b) merge-upsert, (c) field patch, (d) delete. Writes are split-phase:
//! submission returns immediately and the completion callback fires when
//! the backend acknowledges or rejects — at most once per call, no retry,
//! no queueing on our side.

use fleetsync_core::{Collection, DateKey, DocId, Document, Error, Fields, Result};
use std::sync::Arc;

/// One subscription's scope: a collection, optionally narrowed to a day.
///
/// The filter is a single equality predicate on the denormalized `date`
/// field; `None` subscribes to the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Collection to subscribe to.
    pub collection: Collection,
    /// Day filter, if the view is date-scoped.
    pub date: Option<DateKey>,
}

impl Query {
    /// Whole-collection query.
    pub fn all(collection: Collection) -> Self {
        Query {
            collection,
            date: None,
        }
    }

    /// Day-filtered query.
    pub fn for_date(collection: Collection, date: DateKey) -> Self {
        Query {
            collection,
            date: Some(date),
        }
    }

    /// Whether a document belongs in this query's result set.
    pub fn matches(&self, doc: &Document) -> bool {
        match &self.date {
            None => true,
            Some(date) => doc.get_str("date") == Some(date.as_str()),
        }
    }
}

/// Push delivery from a subscription.
#[derive(Debug)]
pub enum FeedEvent {
    /// The complete current result set. Delivered on attach and on every
    /// remote change affecting any matching document — always a full
    /// snapshot, never a diff.
    Snapshot(Vec<Document>),
    /// The subscription could not be established or dropped. Terminal for
    /// this subscription; the consumer decides whether to resubscribe.
    Failed(Error),
}

/// Callback receiving a subscription's deliveries.
pub type SnapshotSink = Arc<dyn Fn(FeedEvent) + Send + Sync>;

/// Completion callback for one submitted write.
pub type WriteCompletion = Box<dyn FnOnce(Result<()>) + Send>;

/// A mutation submitted to the backend.
///
/// The document is always the unit of mutation: there are no nested paths
/// at this level, and no field-level locking. `Upsert` and `Patch` carry
/// merge semantics — fields outside the payload are preserved.
#[derive(Debug)]
pub enum WriteOp {
    /// Idempotent merge-upsert of a whole document.
    Upsert {
        /// Target collection.
        collection: Collection,
        /// Full document (its id addresses the record).
        doc: Document,
    },
    /// Merge-write of only the named fields.
    Patch {
        /// Target collection.
        collection: Collection,
        /// Target document.
        id: DocId,
        /// Fields to replace; nothing else is touched.
        fields: Fields,
    },
    /// Whole-document delete.
    Delete {
        /// Target collection.
        collection: Collection,
        /// Target document.
        id: DocId,
    },
}

impl WriteOp {
    /// Collection this write targets.
    pub fn collection(&self) -> Collection {
        match self {
            WriteOp::Upsert { collection, .. }
            | WriteOp::Patch { collection, .. }
            | WriteOp::Delete { collection, .. } => *collection,
        }
    }

    /// Document this write targets.
    pub fn doc_id(&self) -> &DocId {
        match self {
            WriteOp::Upsert { doc, .. } => doc.id(),
            WriteOp::Patch { id, .. } | WriteOp::Delete { id, .. } => id,
        }
    }
}

/// Narrow backend collaborator the sync core is written against.
pub trait RemoteStore: Send + Sync {
    /// Establish one logical subscription. The sink receives the complete
    /// current result set on attach and again on every relevant change,
    /// in the backend's causal order. Dropping the returned handle detaches.
    fn subscribe(&self, query: Query, sink: SnapshotSink) -> Result<RemoteSubscription>;

    /// Submit a mutation. `done` fires exactly once with the outcome;
    /// delivery is at-most-once and there is no internal retry.
    fn submit(&self, op: WriteOp, done: WriteCompletion);
}

/// Disposable subscription handle. Dropping it detaches the subscription;
/// teardown without detaching would leak a live connection per consumer.
pub struct RemoteSubscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl RemoteSubscription {
    /// Wrap a backend-specific detach action.
    pub fn new(detach: Box<dyn FnOnce() + Send>) -> Self {
        RemoteSubscription {
            detach: Some(detach),
        }
    }

    /// Detach explicitly (equivalent to dropping).
    pub fn dispose(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for RemoteSubscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for RemoteSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSubscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
