//! Subscription lifecycle: states, filters, fan-out, teardown.

use crate::common::*;
use fleetsync::FeedState;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn session_goes_ready_on_first_snapshot() {
    let remote = MemoryRemote::manual();
    let live = open(&remote, Collection::Drivers);

    assert_eq!(live.state(), FeedState::Loading);
    remote.pump();
    assert_eq!(live.state(), FeedState::Ready);
}

#[test]
fn failed_attach_is_a_persistent_error_state() {
    let remote = MemoryRemote::new();
    remote.fail_next_subscribe(Error::Subscription("denied".to_string()));
    let live = open(&remote, Collection::Drivers);

    assert_eq!(live.state(), FeedState::Error);
    assert!(matches!(
        live.subscription_error(),
        Some(Error::Subscription(_))
    ));
    // no automatic retry: still in error after backend activity
    remote.broadcast(Collection::Drivers);
    assert_eq!(live.state(), FeedState::Error);
}

#[test]
fn changing_the_date_resubscribes_through_loading() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::Schedules,
        vec![
            doc("1", json!({"id": "1", "date": "2024-08-01"})),
            doc("2", json!({"id": "2", "date": "2024-08-02"})),
        ],
    );
    let mut live = open_on(&remote, Collection::Schedules, &day());
    remote.pump();
    assert_eq!(ids(&live), vec!["1"]);

    live.set_date(Some(next_day()));
    assert_eq!(live.state(), FeedState::Loading, "full resubscribe");
    remote.pump();
    assert_eq!(live.state(), FeedState::Ready);
    assert_eq!(ids(&live), vec!["2"]);
}

#[test]
fn two_sessions_see_each_others_writes() {
    let remote = MemoryRemote::new();
    let editor = open(&remote, Collection::Drivers);
    let watcher = open(&remote, Collection::Drivers);

    editor
        .create(doc("1", json!({"id": "1", "name": "Alice"})))
        .unwrap();

    assert_eq!(ids(&watcher), vec!["1"]);
    assert_eq!(ids(&editor), vec!["1"]);
}

#[test]
fn independent_collections_do_not_cross_talk() {
    let remote = MemoryRemote::new();
    let drivers = open(&remote, Collection::Drivers);
    let vehicles = open(&remote, Collection::Vehicles);

    drivers
        .create(doc("1", json!({"id": "1", "name": "Alice"})))
        .unwrap();

    assert_eq!(drivers.records().len(), 1);
    assert!(vehicles.records().is_empty());
}

#[test]
fn date_scoped_write_invisible_to_other_day() {
    let remote = MemoryRemote::new();
    let today = open_on(&remote, Collection::DailyStatus, &day());
    let tomorrow = open_on(&remote, Collection::DailyStatus, &next_day());

    today
        .create(status_doc("r1", "2024-08-01", "X", "1,00"))
        .unwrap();

    assert_eq!(today.records().len(), 1);
    assert!(tomorrow.records().is_empty());
}

#[test]
fn dropped_session_stops_observing() {
    let remote = MemoryRemote::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let live = open(&remote, Collection::Drivers);
    let seen = Arc::clone(&counter);
    live.on_change(Box::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    drop(live);

    let writer = open(&remote, Collection::Drivers);
    writer
        .create(doc("1", json!({"id": "1"})))
        .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn redundant_snapshots_do_not_bump_revision() {
    let remote = MemoryRemote::new();
    remote.seed(Collection::Drivers, vec![doc("1", json!({"id": "1"}))]);
    let live = open(&remote, Collection::Drivers);
    let revision = live.revision();

    remote.broadcast(Collection::Drivers);
    remote.broadcast(Collection::Drivers);
    assert_eq!(live.revision(), revision);
}
