//! Subscription lifecycle
//!
//! A [`ChangeFeed`] ties one remote subscription to one logical consumer.
//! It owns the state machine `Initializing → Loading → {Ready, Error}`;
//! `Ready` and `Error` only go back to `Loading` through a full
//! resubscribe (a new feed), which the session layer performs when the
//! filter changes. Errors are surfaced as a persistent state, never
//! retried automatically.
//!
//! A liveness flag guards against deliveries racing teardown: once the
//! feed is detached, late snapshots are discarded instead of updating
//! torn-down state.

use crate::remote::{FeedEvent, Query, RemoteStore, RemoteSubscription, SnapshotSink};
use fleetsync_core::{Document, Error};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Feed lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Constructed, subscription not yet requested.
    Initializing,
    /// Subscription requested, no snapshot yet. Consumers render a
    /// loading placeholder in this state.
    Loading,
    /// At least one snapshot delivered; contents are current.
    Ready,
    /// The subscription failed. Persistent until a full resubscribe.
    Error,
}

/// Receiver for a feed's deliveries, after state bookkeeping.
pub trait FeedDelegate: Send + Sync {
    /// A snapshot arrived. `became_ready` is true exactly once, on the
    /// delivery that moved the feed out of `Loading`.
    fn snapshot(&self, docs: Vec<Document>, became_ready: bool);

    /// The subscription failed (on attach or later).
    fn failed(&self, error: &Error) {
        let _ = error;
    }
}

struct FeedShared {
    phase: RwLock<FeedState>,
    error: RwLock<Option<Error>>,
    alive: AtomicBool,
}

/// One live subscription for one (collection, filter) pair.
pub struct ChangeFeed {
    query: Query,
    shared: Arc<FeedShared>,
    subscription: Option<RemoteSubscription>,
}

impl ChangeFeed {
    /// Subscribe and start delivering into `delegate`.
    pub fn attach(
        remote: &Arc<dyn RemoteStore>,
        query: Query,
        delegate: Arc<dyn FeedDelegate>,
    ) -> ChangeFeed {
        let shared = Arc::new(FeedShared {
            phase: RwLock::new(FeedState::Initializing),
            error: RwLock::new(None),
            alive: AtomicBool::new(true),
        });

        let sink: SnapshotSink = {
            let shared = Arc::clone(&shared);
            let delegate = Arc::clone(&delegate);
            let query = query.clone();
            Arc::new(move |event| {
                if !shared.alive.load(Ordering::SeqCst) {
                    debug!(collection = %query.collection, "dropping delivery after teardown");
                    return;
                }
                match event {
                    FeedEvent::Snapshot(docs) => {
                        let became_ready = {
                            let mut phase = shared.phase.write();
                            let was = *phase;
                            *phase = FeedState::Ready;
                            was != FeedState::Ready
                        };
                        debug!(
                            collection = %query.collection,
                            docs = docs.len(),
                            became_ready,
                            "snapshot delivered"
                        );
                        delegate.snapshot(docs, became_ready);
                    }
                    FeedEvent::Failed(err) => {
                        warn!(collection = %query.collection, error = %err, "subscription failed");
                        *shared.phase.write() = FeedState::Error;
                        *shared.error.write() = Some(err.clone());
                        delegate.failed(&err);
                    }
                }
            })
        };

        *shared.phase.write() = FeedState::Loading;
        let subscription = match remote.subscribe(query.clone(), sink) {
            Ok(sub) => Some(sub),
            Err(err) => {
                warn!(collection = %query.collection, error = %err, "subscribe rejected");
                *shared.phase.write() = FeedState::Error;
                *shared.error.write() = Some(err.clone());
                delegate.failed(&err);
                None
            }
        };

        ChangeFeed {
            query,
            shared,
            subscription,
        }
    }

    /// The query this feed was attached with.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FeedState {
        *self.shared.phase.read()
    }

    /// The subscription error, if the feed is in [`FeedState::Error`].
    pub fn last_error(&self) -> Option<Error> {
        self.shared.error.read().clone()
    }

    /// Tear the subscription down. Late deliveries are discarded from
    /// here on. Called implicitly on drop.
    pub fn detach(&mut self) {
        if self.shared.alive.swap(false, Ordering::SeqCst) {
            debug!(collection = %self.query.collection, "feed detached");
        }
        self.subscription.take();
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("query", &self.query)
            .field("state", &self.state())
            .finish()
    }
}
