//! Write path and orchestration for fleetsync
//!
//! - [`Reconciler`]: arbitrates between optimistic local edits and inbound
//!   feed snapshots so a newer local edit is never regressed by a
//!   slightly-stale snapshot, and failures roll back cleanly
//! - [`MutationGateway`]: whole-document merge writes with `updatedAt`
//!   stamping, optimistic application and at-most-once submission
//! - [`LiveCollection`]: the per-(collection, filter) session wiring
//!   feed → store → reconciler → consumer
//! - [`schedule_ops`] / [`registers`]: typed operations the pages use

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gateway;
pub mod reconciler;
pub mod registers;
pub mod schedule_ops;
pub mod session;

pub use gateway::MutationGateway;
pub use reconciler::Reconciler;
pub use session::{LiveCollection, LiveCollectionBuilder};
