//! Typed schedule operations
//!
//! The schedule page's edits, expressed through the editor and the
//! session. Every one of these is a whole-Schedule rewrite: read the
//! presented document, splice the change in, merge-upsert the result.
//! Removing a vehicle is a structural edit of the schedule document, not
//! a delete of its own; deleting the schedule removes the whole subtree.

use crate::session::LiveCollection;
use fleetsync_core::{
    DateKey, Destination, DocId, EditOp, Error, NodePath, Result, Schedule, StatusRecord, Vehicle,
};
use serde_json::Value;

/// Array field holding a schedule's vehicles.
const VEHICLES: &str = "vehicles";
/// Array field holding a vehicle's destinations.
const DESTINATIONS: &str = "destinations";

/// Create a fresh empty schedule for a day.
pub fn add_schedule(live: &LiveCollection, name: &str, date: &DateKey) -> Result<DocId> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("schedule name must not be empty".to_string()));
    }
    let schedule = Schedule::new(DocId::generate(), name, date.clone());
    let id = schedule.id.clone();
    live.create(fleetsync_core::Document::from_typed(&schedule)?)?;
    Ok(id)
}

/// Rename a schedule (field patch, not a rewrite).
pub fn rename_schedule(live: &LiveCollection, id: &DocId, name: &str) -> Result<u64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("schedule name must not be empty".to_string()));
    }
    let mut fields = fleetsync_core::Fields::new();
    fields.insert("name".to_string(), Value::from(name));
    live.patch(id, fields)
}

/// Append a blank vehicle to a schedule, returning its id.
pub fn add_vehicle(live: &LiveCollection, schedule_id: &DocId) -> Result<DocId> {
    let vehicle = Vehicle::blank(DocId::generate());
    let id = vehicle.id.clone();
    live.edit_document(
        schedule_id,
        &NodePath::root(),
        &EditOp::Append {
            array: VEHICLES.to_string(),
            child: serde_json::to_value(&vehicle).map_err(fleetsync_core::Error::from)?,
        },
    )?;
    Ok(id)
}

/// Remove a vehicle (and, by containment, its destinations) from a
/// schedule.
pub fn remove_vehicle(live: &LiveCollection, schedule_id: &DocId, vehicle_id: &DocId) -> Result<u64> {
    live.edit_document(
        schedule_id,
        &NodePath::root(),
        &EditOp::RemoveChild {
            array: VEHICLES.to_string(),
            id: vehicle_id.clone(),
        },
    )
}

/// Set one field of a vehicle.
pub fn set_vehicle_field(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
    field: &str,
    value: Value,
) -> Result<u64> {
    live.edit_document(
        schedule_id,
        &NodePath::root().child(VEHICLES, vehicle_id.clone()),
        &EditOp::Set {
            field: field.to_string(),
            value,
        },
    )
}

/// Flip a vehicle between in-transit and completed.
///
/// A vehicle removed by a concurrent edit makes this a no-op.
pub fn toggle_vehicle_status(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
) -> Result<()> {
    let Some(doc) = live.get(schedule_id) else {
        return Err(Error::NotFound {
            collection: live.collection(),
            id: schedule_id.clone(),
        });
    };
    let schedule: Schedule = doc.to_typed()?;
    let Some(vehicle) = schedule.vehicle(vehicle_id) else {
        return Ok(()); // concurrently removed
    };
    let next = vehicle.status.toggled();
    set_vehicle_field(
        live,
        schedule_id,
        vehicle_id,
        "status",
        serde_json::to_value(next).map_err(fleetsync_core::Error::from)?,
    )?;
    Ok(())
}

/// Replace a vehicle's transport reference selection.
pub fn set_transport_refs(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
    refs: Vec<String>,
) -> Result<u64> {
    set_vehicle_field(
        live,
        schedule_id,
        vehicle_id,
        "transportRefs",
        Value::from(refs),
    )
}

/// Append a blank destination to a vehicle, returning its id.
pub fn add_destination(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
) -> Result<DocId> {
    let destination = Destination::blank(DocId::generate());
    let id = destination.id.clone();
    live.edit_document(
        schedule_id,
        &NodePath::root().child(VEHICLES, vehicle_id.clone()),
        &EditOp::Append {
            array: DESTINATIONS.to_string(),
            child: serde_json::to_value(&destination).map_err(fleetsync_core::Error::from)?,
        },
    )?;
    Ok(id)
}

/// Remove a destination from a vehicle.
pub fn remove_destination(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
    destination_id: &DocId,
) -> Result<u64> {
    live.edit_document(
        schedule_id,
        &NodePath::root().child(VEHICLES, vehicle_id.clone()),
        &EditOp::RemoveChild {
            array: DESTINATIONS.to_string(),
            id: destination_id.clone(),
        },
    )
}

/// Set one field of a destination (name, time, observation).
pub fn set_destination_field(
    live: &LiveCollection,
    schedule_id: &DocId,
    vehicle_id: &DocId,
    destination_id: &DocId,
    field: &str,
    value: Value,
) -> Result<u64> {
    live.edit_document(
        schedule_id,
        &NodePath::root()
            .child(VEHICLES, vehicle_id.clone())
            .child(DESTINATIONS, destination_id.clone()),
        &EditOp::Set {
            field: field.to_string(),
            value,
        },
    )
}

/// Transport identifiers a vehicle may still claim: every status record's
/// non-empty identifier not already claimed by some vehicle, keeping the
/// asking vehicle's own current picks offered.
pub fn available_transport_refs(
    schedules: &[Schedule],
    status_records: &[StatusRecord],
    current: &[String],
) -> Vec<String> {
    let claimed: Vec<&String> = schedules
        .iter()
        .flat_map(|s| s.vehicles.iter())
        .flat_map(|v| v.transport_refs.iter())
        .collect();

    status_records
        .iter()
        .filter(|r| !r.transport_ref.is_empty())
        .filter(|r| {
            !claimed.contains(&&r.transport_ref) || current.contains(&r.transport_ref)
        })
        .map(|r| r.transport_ref.clone())
        .collect()
}
