//! Live collection sessions
//!
//! A [`LiveCollection`] is what a page holds: one subscription's worth of
//! reconciled, optimistically-edited documents, plus the mutation entry
//! points. It wires feed → store → reconciler → consumer and tears the
//! subscription down on drop.
//!
//! Selected date and other view state are owned by the page controller
//! and passed in — changing the day is an explicit
//! [`set_date`](LiveCollection::set_date), which performs the full
//! resubscribe the feed state machine requires.

use crate::gateway::{ChangeHook, MutationGateway};
use crate::reconciler::Reconciler;
use fleetsync_core::{
    edit, Collection, DateKey, DocId, Document, EditOp, Error, Fields, NodePath, Result,
};
use fleetsync_store::{ChangeFeed, DocumentStore, FeedDelegate, FeedState, Query, RemoteStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Registered change listeners. Notified after any visible transition:
/// adopted snapshot, optimistic edit, acknowledgment, rollback, feed
/// failure.
#[derive(Default)]
struct ListenerSet {
    listeners: Mutex<Vec<Box<dyn Fn() + Send + Sync>>>,
}

impl ListenerSet {
    fn notify(&self) {
        // listeners must not register further listeners from inside the
        // callback
        for listener in self.listeners.lock().iter() {
            listener();
        }
    }

    fn push(&self, listener: Box<dyn Fn() + Send + Sync>) {
        self.listeners.lock().push(listener);
    }
}

/// Feed delegate: adopt snapshots through the reconciler, notify on
/// visible change.
struct SessionDelegate {
    reconciler: Arc<Reconciler>,
    listeners: Arc<ListenerSet>,
}

impl FeedDelegate for SessionDelegate {
    fn snapshot(&self, docs: Vec<Document>, became_ready: bool) {
        let changed = self.reconciler.apply_snapshot(docs);
        if changed || became_ready {
            self.listeners.notify();
        }
    }

    fn failed(&self, _error: &Error) {
        self.listeners.notify();
    }
}

/// Builder for [`LiveCollection`].
pub struct LiveCollectionBuilder {
    remote: Arc<dyn RemoteStore>,
    collection: Collection,
    date: Option<DateKey>,
}

impl LiveCollectionBuilder {
    /// Narrow the subscription to one day (equality on the `date` field).
    pub fn date(mut self, date: DateKey) -> Self {
        self.date = Some(date);
        self
    }

    /// Subscribe and return the live session.
    ///
    /// A rejected or failing subscription is not an error here: the
    /// session opens in [`FeedState::Error`] and the consumer decides
    /// whether to resubscribe.
    pub fn open(self) -> LiveCollection {
        let store = Arc::new(DocumentStore::new());
        let reconciler = Arc::new(Reconciler::new(Arc::clone(&store)));
        let listeners = Arc::new(ListenerSet::default());
        let alive = Arc::new(AtomicBool::new(true));

        let delegate: Arc<dyn FeedDelegate> = Arc::new(SessionDelegate {
            reconciler: Arc::clone(&reconciler),
            listeners: Arc::clone(&listeners),
        });

        let changed: ChangeHook = {
            let listeners = Arc::clone(&listeners);
            Arc::new(move || listeners.notify())
        };
        let gateway = MutationGateway::new(
            Arc::clone(&self.remote),
            self.collection,
            Arc::clone(&reconciler),
            Arc::clone(&alive),
            changed,
        );

        let query = Query {
            collection: self.collection,
            date: self.date,
        };
        let feed = ChangeFeed::attach(&self.remote, query.clone(), Arc::clone(&delegate));

        LiveCollection {
            remote: self.remote,
            query,
            store,
            reconciler,
            gateway,
            feed,
            delegate,
            listeners,
            alive,
        }
    }
}

/// One page's live, filtered, optimistically-edited collection view.
pub struct LiveCollection {
    remote: Arc<dyn RemoteStore>,
    query: Query,
    store: Arc<DocumentStore>,
    reconciler: Arc<Reconciler>,
    gateway: MutationGateway,
    feed: ChangeFeed,
    delegate: Arc<dyn FeedDelegate>,
    listeners: Arc<ListenerSet>,
    alive: Arc<AtomicBool>,
}

impl LiveCollection {
    /// Start building a session over `collection`.
    pub fn builder(remote: Arc<dyn RemoteStore>, collection: Collection) -> LiveCollectionBuilder {
        LiveCollectionBuilder {
            remote,
            collection,
            date: None,
        }
    }

    /// The collection this session is attached to.
    pub fn collection(&self) -> Collection {
        self.query.collection
    }

    /// The current day filter.
    pub fn date(&self) -> Option<&DateKey> {
        self.query.date.as_ref()
    }

    /// Feed lifecycle state. Consumers render a placeholder while
    /// [`FeedState::Loading`].
    pub fn state(&self) -> FeedState {
        self.feed.state()
    }

    /// The persistent subscription error, if the feed is in
    /// [`FeedState::Error`].
    pub fn subscription_error(&self) -> Option<Error> {
        self.feed.last_error()
    }

    /// The reconciled result set: baseline in snapshot order with pending
    /// local edits overlaid.
    pub fn records(&self) -> Vec<Document> {
        self.reconciler.records()
    }

    /// Reconciled view of one document.
    pub fn get(&self, id: &DocId) -> Option<Document> {
        self.reconciler.get(id)
    }

    /// Baseline change counter: bumped exactly when a snapshot actually
    /// changed the store contents. Optimistic overlays notify listeners
    /// but do not bump this.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Whether a document has an unacknowledged local edit.
    pub fn has_pending(&self, id: &DocId) -> bool {
        self.reconciler.has_pending(id)
    }

    /// Take the most recent write failure for user display.
    pub fn take_write_error(&self) -> Option<Error> {
        self.reconciler.take_write_error()
    }

    /// Register a change listener for this session's lifetime.
    pub fn on_change(&self, listener: Box<dyn Fn() + Send + Sync>) {
        self.listeners.push(listener);
    }

    /// Merge-upsert a whole document (optimistic).
    pub fn create(&self, doc: Document) -> Result<u64> {
        self.gateway.create(doc)
    }

    /// Merge-write only the named fields (optimistic).
    pub fn patch(&self, id: &DocId, fields: Fields) -> Result<u64> {
        self.gateway.patch(id, fields)
    }

    /// Delete a whole document (optimistic).
    pub fn remove(&self, id: &DocId) -> Result<u64> {
        self.gateway.remove(id)
    }

    /// Edit a nested field: read the presented document, splice the change
    /// into a fresh copy, write the whole document back.
    ///
    /// This is the deliberate contract of the system — nested edits are
    /// whole-document rewrites at document granularity, not field-path
    /// writes. A path through a concurrently-removed child makes the
    /// rewrite a no-op copy, which is still written (harmless merge).
    pub fn edit_document(&self, id: &DocId, path: &NodePath, op: &EditOp) -> Result<u64> {
        let current = self.get(id).ok_or_else(|| Error::NotFound {
            collection: self.query.collection,
            id: id.clone(),
        })?;
        let updated = edit(&current, path, op);
        self.gateway.create(updated)
    }

    /// Switch the day filter: full resubscribe, dropping pending edits
    /// staged against the previous filter.
    pub fn set_date(&mut self, date: Option<DateKey>) {
        if self.query.date == date {
            return;
        }
        debug!(collection = %self.query.collection, ?date, "resubscribing with new filter");
        self.query.date = date;
        self.reconciler.clear_pending();
        self.feed.detach();
        self.feed = ChangeFeed::attach(
            &self.remote,
            self.query.clone(),
            Arc::clone(&self.delegate),
        );
        self.listeners.notify();
    }
}

impl Drop for LiveCollection {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for LiveCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveCollection")
            .field("query", &self.query)
            .field("state", &self.state())
            .field("records", &self.store.len())
            .finish()
    }
}
