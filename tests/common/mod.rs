//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Once;

pub use fleetsync::{
    Collection, DateKey, DocId, Document, Error, Fields, LiveCollection, MemoryRemote, Query,
    RemoteStore, Schedule, StatusRecord,
};
use std::sync::Arc;

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once so `tracing` output shows up under
/// `--nocapture`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// The day most fixtures live on.
pub fn day() -> DateKey {
    "2024-08-01".parse().unwrap()
}

/// Another day, for filter-change tests.
pub fn next_day() -> DateKey {
    "2024-08-02".parse().unwrap()
}

/// Build a document from literal JSON.
pub fn doc(id: &str, body: serde_json::Value) -> Document {
    Document::from_value(DocId::from(id), body).unwrap()
}

/// A daily-status document with the fields the aggregation tests use.
pub fn status_doc(id: &str, date: &str, industry: &str, weight: &str) -> Document {
    doc(
        id,
        serde_json::json!({
            "id": id,
            "date": date,
            "industria": industry,
            "peso": weight,
        }),
    )
}

/// Open a session over the given collection with no filter.
pub fn open(remote: &Arc<MemoryRemote>, collection: Collection) -> LiveCollection {
    init_tracing();
    LiveCollection::builder(remote.clone(), collection).open()
}

/// Open a session over the given collection filtered to `date`.
pub fn open_on(
    remote: &Arc<MemoryRemote>,
    collection: Collection,
    date: &DateKey,
) -> LiveCollection {
    init_tracing();
    LiveCollection::builder(remote.clone(), collection)
        .date(date.clone())
        .open()
}

/// Ids of the presented records, in order.
pub fn ids(live: &LiveCollection) -> Vec<String> {
    live.records()
        .iter()
        .map(|d| d.id().as_str().to_string())
        .collect()
}

/// Value of `field` across the presented records, in order.
pub fn field_values(live: &LiveCollection, field: &str) -> Vec<String> {
    live.records()
        .iter()
        .map(|d| d.get_str(field).unwrap_or("").to_string())
        .collect()
}
