//! Whole-document rewrites of containment trees, end to end.

use crate::common::*;
use fleetsync::schedule_ops::{
    add_destination, add_schedule, add_vehicle, remove_destination, remove_vehicle,
    rename_schedule, set_destination_field, set_transport_refs, set_vehicle_field,
    toggle_vehicle_status,
};
use fleetsync::{DocId as Id, VehicleStatus};
use serde_json::json;

fn schedule_of(live: &LiveCollection, id: &Id) -> Schedule {
    live.get(id).unwrap().to_typed().unwrap()
}

#[test]
fn full_schedule_lifecycle() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::Schedules, &day());

    let sid = add_schedule(&live, "DAILY SCHEDULE 1", &day()).unwrap();
    let vid = add_vehicle(&live, &sid).unwrap();
    set_vehicle_field(&live, &sid, &vid, "plate", json!("ABC-1234")).unwrap();
    set_vehicle_field(&live, &sid, &vid, "driver", json!("Alice")).unwrap();
    set_vehicle_field(&live, &sid, &vid, "origin", json!("Main depot")).unwrap();
    set_vehicle_field(&live, &sid, &vid, "originTime", json!("06:00")).unwrap();
    set_transport_refs(&live, &sid, &vid, vec!["52736285".to_string()]).unwrap();

    let d1 = add_destination(&live, &sid, &vid).unwrap();
    set_destination_field(&live, &sid, &vid, &d1, "name", json!("Harbor")).unwrap();
    set_destination_field(&live, &sid, &vid, &d1, "time", json!("08:30")).unwrap();
    let d2 = add_destination(&live, &sid, &vid).unwrap();
    set_destination_field(&live, &sid, &vid, &d2, "name", json!("Airport")).unwrap();

    let schedule = schedule_of(&live, &sid);
    assert_eq!(schedule.name, "DAILY SCHEDULE 1");
    let vehicle = &schedule.vehicles[0];
    assert_eq!(vehicle.plate, "ABC-1234");
    assert_eq!(vehicle.origin_time, "06:00");
    assert_eq!(vehicle.transport_refs, vec!["52736285"]);
    assert_eq!(vehicle.destinations.len(), 2);
    assert_eq!(vehicle.destinations[0].time.as_deref(), Some("08:30"));
    assert_eq!(vehicle.destinations[1].name, "Airport");

    // removing the vehicle drops the whole subtree in one rewrite
    remove_vehicle(&live, &sid, &vid).unwrap();
    assert!(schedule_of(&live, &sid).vehicles.is_empty());

    // deleting the schedule removes the aggregate
    live.remove(&sid).unwrap();
    assert!(live.records().is_empty());
    assert!(remote.table(Collection::Schedules).is_empty());
}

#[test]
fn rename_is_a_field_patch_not_a_rewrite() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::Schedules, &day());
    let sid = add_schedule(&live, "OLD NAME", &day()).unwrap();
    let vid = add_vehicle(&live, &sid).unwrap();

    rename_schedule(&live, &sid, "NEW NAME").unwrap();

    let schedule = schedule_of(&live, &sid);
    assert_eq!(schedule.name, "NEW NAME");
    assert_eq!(schedule.vehicles[0].id, vid, "vehicles untouched");
}

#[test]
fn toggling_status_round_trips() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::Schedules, &day());
    let sid = add_schedule(&live, "RUN", &day()).unwrap();
    let vid = add_vehicle(&live, &sid).unwrap();

    toggle_vehicle_status(&live, &sid, &vid).unwrap();
    assert_eq!(
        schedule_of(&live, &sid).vehicles[0].status,
        VehicleStatus::Completed
    );
}

#[test]
fn concurrent_removal_absorbs_the_edit() {
    let remote = MemoryRemote::new();
    let editor = open_on(&remote, Collection::Schedules, &day());
    let other = open_on(&remote, Collection::Schedules, &day());

    let sid = add_schedule(&editor, "RUN", &day()).unwrap();
    let vid = add_vehicle(&editor, &sid).unwrap();
    let did = add_destination(&editor, &sid, &vid).unwrap();

    // the other client removes the destination
    remove_destination(&other, &sid, &vid, &did).unwrap();

    // our edit targets the removed child: no crash, no resurrection
    set_destination_field(&editor, &sid, &vid, &did, "time", json!("09:00")).unwrap();
    let schedule = schedule_of(&editor, &sid);
    assert!(schedule.vehicles[0].destinations.is_empty());
}

#[test]
fn nested_edit_while_write_pending_builds_on_the_optimistic_state() {
    let remote = MemoryRemote::manual();
    remote.seed(
        Collection::Schedules,
        vec![doc(
            "s1",
            json!({
                "id": "s1",
                "name": "RUN",
                "date": "2024-08-01",
                "vehicles": [{"id": "v1", "plate": "", "driver": "", "origin": "",
                               "originTime": "", "destinations": [], "status": "InTransit",
                               "transportRefs": []}]
            }),
        )],
    );
    let live = open_on(&remote, Collection::Schedules, &day());
    remote.pump();

    let sid = Id::from("s1");
    let vid = Id::from("v1");
    set_vehicle_field(&live, &sid, &vid, "plate", json!("ABC-1234")).unwrap();
    // the first write is still pending; the second edit must see the plate
    set_vehicle_field(&live, &sid, &vid, "driver", json!("Alice")).unwrap();

    let schedule = schedule_of(&live, &sid);
    assert_eq!(schedule.vehicles[0].plate, "ABC-1234");
    assert_eq!(schedule.vehicles[0].driver, "Alice");

    remote.complete_next_write(Ok(()));
    remote.complete_next_write(Ok(()));
    let stored: Schedule = remote.table(Collection::Schedules)[0].to_typed().unwrap();
    assert_eq!(stored.vehicles[0].plate, "ABC-1234");
    assert_eq!(stored.vehicles[0].driver, "Alice");
}
