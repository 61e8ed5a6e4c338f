//! Boundary collaborators driven end to end: paste import into the live
//! collection, export rows from it, message composition from a built
//! schedule.

use crate::common::*;
use fleetsync::schedule_ops::{
    add_destination, add_schedule, add_vehicle, set_destination_field, set_vehicle_field,
};
use fleetsync::{
    compose_schedule_message, parse_tabular, rows, stage_status_records, status_columns,
    Document as Doc, ExportColumn,
};
use serde_json::json;

#[test]
fn paste_to_confirmed_bulk_insert() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::DailyStatus, &day());

    let pasted = "Transporte SAP\tROTAS\tPESO\tCaixas\n\
                  52736285\tRAH8604-SC / BOA MESA\t4.965,30\t1.295\n\
                  badline\n\
                  52736290\tRAH8605-SC\t2.100,00\t800";
    let staged = parse_tabular(pasted);
    assert_eq!(staged.len(), 2, "malformed line dropped");

    // user confirms: each staged record becomes a daily-status document
    for record in stage_status_records(&day(), &staged) {
        live.create(Doc::from_typed(&record).unwrap()).unwrap();
    }

    let records = live.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_str("transportRef"), Some("52736285"));
    assert_eq!(records[0].get_str("peso"), Some("4.965,30"));
    assert_eq!(records[1].get_str("boxCount"), Some("800"));
    assert!(records.iter().all(|r| r.get_str("date") == Some("2024-08-01")));
}

#[test]
fn export_rows_from_the_live_view() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::DailyStatus, &day());
    live.create(doc(
        "r1",
        json!({
            "id": "r1", "date": "2024-08-01", "industria": "X",
            "peso": "1,00", "docProtocol": true, "status": "Pending"
        }),
    ))
    .unwrap();

    let exported = rows(&live.records(), &status_columns());
    assert_eq!(exported.len(), 1);
    let row = &exported[0];
    assert_eq!(row["Industry"], "X");
    assert_eq!(row["Weight"], "1,00");
    assert_eq!(row["Protocol doc"], "Yes");
    assert_eq!(row["Status"], "Pending");
    assert_eq!(row["Driver"], "", "absent fields export empty");
}

#[test]
fn export_respects_a_sorted_view() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::DailyStatus, &day());
    live.create(status_doc("r1", "2024-08-01", "B", "2,00"))
        .unwrap();
    live.create(status_doc("r2", "2024-08-01", "A", "1,00"))
        .unwrap();

    let sorted = fleetsync::sort_records(
        &live.records(),
        "industria",
        fleetsync::SortDirection::Asc,
    );
    let exported = rows(
        &sorted,
        &[ExportColumn::new("industria", "Industry")],
    );
    let industries: Vec<_> = exported.iter().map(|r| r["Industry"].clone()).collect();
    assert_eq!(industries, vec!["A", "B"]);
}

#[test]
fn message_for_a_schedule_built_through_the_session() {
    let remote = MemoryRemote::new();
    let live = open_on(&remote, Collection::Schedules, &day());
    let sid = add_schedule(&live, "DAILY SCHEDULE 1", &day()).unwrap();
    let vid = add_vehicle(&live, &sid).unwrap();
    set_vehicle_field(&live, &sid, &vid, "plate", json!("ABC-1234")).unwrap();
    set_vehicle_field(&live, &sid, &vid, "driver", json!("Alice")).unwrap();
    set_vehicle_field(&live, &sid, &vid, "origin", json!("Main depot")).unwrap();
    let did = add_destination(&live, &sid, &vid).unwrap();
    set_destination_field(&live, &sid, &vid, &did, "name", json!("Harbor")).unwrap();
    set_destination_field(&live, &sid, &vid, &did, "time", json!("08:30")).unwrap();

    let schedule: Schedule = live.get(&sid).unwrap().to_typed().unwrap();
    let message = compose_schedule_message(&schedule);

    assert!(message.contains("*DAILY SCHEDULE 1*"));
    assert!(message.contains("Date: 01/08/2024"));
    assert!(message.contains("*Plate: ABC-1234*"));
    assert!(message.contains("Driver: Alice"));
    assert!(message.contains("Destination 1: Harbor"));
    assert!(message.contains("Time: 08:30"));
    assert!(message.ends_with("Total vehicles: 1"));
}
