//! Document store, change feed and the remote contract
//!
//! This crate owns the read path of the sync core:
//! - [`RemoteStore`]: the narrow collaborator trait a backend implements
//!   (subscribe with full-snapshot push, split-phase merge writes)
//! - [`DocumentStore`]: the canonical in-memory contents of one
//!   (collection, filter) pair
//! - [`ChangeFeed`]: subscription lifecycle and the
//!   `Initializing → Loading → {Ready, Error}` state machine
//! - [`MemoryRemote`]: in-memory reference backend with deterministic,
//!   manually-pumpable delivery for tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod feed;
pub mod memory;
pub mod remote;
pub mod store;

pub use feed::{ChangeFeed, FeedDelegate, FeedState};
pub use memory::MemoryRemote;
pub use remote::{
    FeedEvent, Query, RemoteStore, RemoteSubscription, SnapshotSink, WriteCompletion, WriteOp,
};
pub use store::DocumentStore;
