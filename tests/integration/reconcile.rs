//! Optimistic edits racing snapshots and acknowledgments.
//!
//! The distributed-concurrency cases: stale snapshots arriving while a
//! write is in flight, superseding edits, failures rolling back, and
//! teardown racing completions.

use crate::common::*;
use fleetsync::Fields;
use serde_json::json;

/// The classic race: patch issued, a stale snapshot arrives before the
/// ack. The patched value must keep showing; on ack the next snapshot is
/// adopted.
#[test]
fn stale_snapshot_does_not_regress_a_pending_patch() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::DailyStatus,
        vec![status_doc("r1", "2024-08-01", "X", "100,00")],
    );
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();
    assert_eq!(field_values(&live, "peso"), vec!["100,00"]);

    let mut fields = Fields::new();
    fields.insert("peso".to_string(), json!("200,00"));
    live.patch(&DocId::from("r1"), fields).unwrap();
    assert_eq!(field_values(&live, "peso"), vec!["200,00"], "optimistic");

    // another client's activity redelivers the pre-write result set
    remote.broadcast(Collection::DailyStatus);
    assert_eq!(
        field_values(&live, "peso"),
        vec!["200,00"],
        "stale snapshot must not win while the write is pending"
    );

    // acknowledgment: backend applies, fans out, acks
    remote.complete_next_write(Ok(()));
    assert_eq!(field_values(&live, "peso"), vec!["200,00"]);
    assert!(!live.has_pending(&DocId::from("r1")));
}

#[test]
fn failed_write_reverts_to_last_snapshot_and_surfaces() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::DailyStatus,
        vec![status_doc("r1", "2024-08-01", "X", "100,00")],
    );
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();

    let mut fields = Fields::new();
    fields.insert("peso".to_string(), json!("200,00"));
    live.patch(&DocId::from("r1"), fields).unwrap();
    assert_eq!(field_values(&live, "peso"), vec!["200,00"]);

    remote.complete_next_write(Err(Error::Unavailable("offline".to_string())));
    assert_eq!(
        field_values(&live, "peso"),
        vec!["100,00"],
        "rolled back to last known good"
    );
    assert!(matches!(
        live.take_write_error(),
        Some(Error::Unavailable(_))
    ));
    assert!(live.take_write_error().is_none(), "surfaced once");
}

#[test]
fn second_edit_supersedes_the_first_pending_marker() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::DailyStatus,
        vec![status_doc("r1", "2024-08-01", "X", "100,00")],
    );
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();

    let mut first = Fields::new();
    first.insert("peso".to_string(), json!("200,00"));
    live.patch(&DocId::from("r1"), first).unwrap();
    let mut second = Fields::new();
    second.insert("peso".to_string(), json!("300,00"));
    live.patch(&DocId::from("r1"), second).unwrap();

    assert_eq!(field_values(&live, "peso"), vec!["300,00"], "last edit wins");
    assert_eq!(remote.queued_writes(), 2, "both writes travel in order");

    // the first ack must not clear the newer pending state
    remote.complete_next_write(Ok(()));
    assert_eq!(field_values(&live, "peso"), vec!["300,00"]);
    assert!(live.has_pending(&DocId::from("r1")));

    remote.complete_next_write(Ok(()));
    assert_eq!(field_values(&live, "peso"), vec!["300,00"]);
    assert!(!live.has_pending(&DocId::from("r1")));
}

#[test]
fn create_is_visible_before_acknowledgment() {
    let remote = MemoryRemote::manual();
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();

    live.create(status_doc("r9", "2024-08-01", "Y", "5,00"))
        .unwrap();
    assert_eq!(ids(&live), vec!["r9"], "optimistically listed");
    assert!(live.has_pending(&DocId::from("r9")));

    remote.complete_next_write(Ok(()));
    assert_eq!(ids(&live), vec!["r9"], "adopted from the snapshot");
    assert!(!live.has_pending(&DocId::from("r9")));
}

#[test]
fn remove_hides_immediately_and_failure_restores() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::DailyStatus,
        vec![
            status_doc("r1", "2024-08-01", "X", "1,00"),
            status_doc("r2", "2024-08-01", "Y", "2,00"),
        ],
    );
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();

    live.remove(&DocId::from("r1")).unwrap();
    assert_eq!(ids(&live), vec!["r2"], "optimistically hidden");

    remote.complete_next_write(Err(Error::PermissionDenied("rules".to_string())));
    assert_eq!(ids(&live), vec!["r1", "r2"], "restored on failure");
    assert!(live.take_write_error().is_some());
}

#[test]
fn merge_upsert_preserves_an_independent_writers_fields() {
    let remote = MemoryRemote::new();
    let live_a = open(&remote, Collection::Drivers);
    let live_b = open(&remote, Collection::Drivers);

    // two call sites write different subsets of the same document
    live_a
        .create(doc("1", json!({"id": "1", "name": "Alice"})))
        .unwrap();
    live_b
        .create(doc("1", json!({"id": "1", "phone": "555"})))
        .unwrap();

    let presented = live_a.get(&DocId::from("1")).unwrap();
    assert_eq!(presented.get_str("name"), Some("Alice"));
    assert_eq!(presented.get_str("phone"), Some("555"));
}

#[test]
fn updated_at_is_stamped_by_the_gateway() {
    let remote = MemoryRemote::new();
    let live = open(&remote, Collection::Drivers);

    live.create(doc("1", json!({"id": "1", "name": "Alice", "updatedAt": 7})))
        .unwrap();
    let stored = live.get(&DocId::from("1")).unwrap();
    let stamped = stored.updated_at().unwrap();
    assert_ne!(stamped, 7, "caller value overwritten");

    live.patch(&DocId::from("1"), {
        let mut f = Fields::new();
        f.insert("name".to_string(), json!("Alice B."));
        f
    })
    .unwrap();
    let restamped = live.get(&DocId::from("1")).unwrap().updated_at().unwrap();
    assert!(restamped >= stamped);
}

#[test]
fn teardown_discards_in_flight_completions() {
    let remote = MemoryRemote::manual();
    let live = open_on(&remote, Collection::DailyStatus, &day());
    remote.pump();
    live.create(status_doc("r1", "2024-08-01", "X", "1,00"))
        .unwrap();

    drop(live);
    // completing after the view is gone must not panic
    assert!(remote.complete_next_write(Ok(())));
    assert_eq!(remote.table(Collection::DailyStatus).len(), 1);
}
