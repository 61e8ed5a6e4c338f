//! fleetsync - live synchronized document store for fleet dispatch tooling
//!
//! The core every page of the dispatch tool is built on: per-collection
//! subscriptions with full-snapshot push, whole-document optimistic
//! mutation with rollback, pure nested-path editing over containment
//! trees, and client-side derived views.
//!
//! # Quick start
//!
//! ```
//! use fleetsync::{Collection, DocId, Document, LiveCollection, MemoryRemote};
//! use serde_json::json;
//!
//! // an in-memory backend; any RemoteStore implementation works
//! let remote = MemoryRemote::new();
//!
//! // one live session per (collection, filter) pair
//! let drivers = LiveCollection::builder(remote, Collection::Drivers).open();
//!
//! // optimistic merge-upsert; the feed pushes the change back as a snapshot
//! let doc = Document::from_value(
//!     DocId::from("1"),
//!     json!({"id": "1", "name": "Alice"}),
//! ).unwrap();
//! drivers.create(doc).unwrap();
//! assert_eq!(drivers.records().len(), 1);
//! ```
//!
//! # Architecture
//!
//! Data flows ChangeFeed → DocumentStore (baseline) → Reconciler (pending
//! local edits overlaid) → DerivedView → consumer. Edits flow the other
//! way: nested-path editor → MutationGateway (optimistic apply + write) →
//! Reconciler (pending until acknowledged or rolled back).

// Re-export the public API of the member crates.
pub use fleetsync_core::{
    edit, edit_with, mobile_users, now_millis, Collection, DateKey, Destination, DocId, Document,
    EditOp, Error, Fields, Location, LocationKind, MobileUser, NamedRecord, NodePath,
    RecordStatus, Result, Schedule, StatusRecord, Step, Vehicle, VehicleStatus,
};
pub use fleetsync_interop::{
    compose_schedule_message, display_date, parse_tabular, rows, schedule_rows,
    stage_status_records, status_columns, ExportColumn, ImportRecord,
};
pub use fleetsync_store::{
    ChangeFeed, DocumentStore, FeedDelegate, FeedEvent, FeedState, MemoryRemote, Query,
    RemoteStore, RemoteSubscription, SnapshotSink, WriteCompletion, WriteOp,
};
pub use fleetsync_sync::{
    registers, schedule_ops, LiveCollection, LiveCollectionBuilder, MutationGateway, Reconciler,
};
pub use fleetsync_view::{
    fleet_counts, format_decimal_br, live_pallet_total, pallet_patch, pallet_total,
    parse_locale_decimal, sort_records, sum_by_category, sum_selected, FleetCounts, Selection,
    SortDirection, SortState,
};
