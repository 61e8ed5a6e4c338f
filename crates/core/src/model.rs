//! Typed entity models
//!
//! The store itself is dynamic (see [`crate::document`]); these structs are
//! the typed faces the pages author and consume. Wire names are camelCase.
//! `peso` and `industria` keep their historical wire names: the weight
//! aggregation contract keys on them.
//!
//! Schedules own their vehicles by containment: a [`Vehicle`] exists only
//! inside a [`Schedule`] document and a [`Destination`] only inside a
//! vehicle. Deleting a schedule deletes the subtree in one document
//! removal; removing a vehicle is a structural edit of the schedule.

use crate::error::{Error, Result};
use crate::types::{DateKey, DocId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Schedule aggregate
// =============================================================================

/// Daily schedule aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Document id.
    pub id: DocId,
    /// Display name, e.g. `"DAILY SCHEDULE 1"`.
    pub name: String,
    /// Day this schedule belongs to.
    pub date: DateKey,
    /// Owned vehicles, in insertion order.
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl Schedule {
    /// A fresh empty schedule for a day.
    pub fn new(id: DocId, name: impl Into<String>, date: DateKey) -> Self {
        Schedule {
            id,
            name: name.into(),
            date,
            vehicles: Vec::new(),
        }
    }

    /// Find an owned vehicle by id.
    pub fn vehicle(&self, id: &DocId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.id == id)
    }
}

/// Vehicle entry owned by exactly one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Id unique within the owning schedule.
    pub id: DocId,
    /// License plate.
    pub plate: String,
    /// Driver name (free text, usually autocompleted from the register).
    pub driver: String,
    /// Departure location name.
    pub origin: String,
    /// Departure time, `HH:MM`.
    pub origin_time: String,
    /// Owned destinations, in visit order.
    #[serde(default)]
    pub destinations: Vec<Destination>,
    /// Transit state.
    #[serde(default)]
    pub status: VehicleStatus,
    /// Soft references to daily status transport identifiers (by value,
    /// no referential integrity).
    #[serde(default)]
    pub transport_refs: Vec<String>,
    /// Optional route description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Optional freight weight (locale-formatted string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

impl Vehicle {
    /// A blank vehicle with a fresh id, as added from the schedule page.
    pub fn blank(id: DocId) -> Self {
        Vehicle {
            id,
            plate: String::new(),
            driver: String::new(),
            origin: String::new(),
            origin_time: String::new(),
            destinations: Vec::new(),
            status: VehicleStatus::InTransit,
            transport_refs: Vec::new(),
            route: None,
            weight: None,
        }
    }

    /// Find an owned destination by id.
    pub fn destination(&self, id: &DocId) -> Option<&Destination> {
        self.destinations.iter().find(|d| &d.id == id)
    }
}

/// Transit state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// On the road.
    #[default]
    InTransit,
    /// Finished its run.
    Completed,
}

impl VehicleStatus {
    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            VehicleStatus::InTransit => VehicleStatus::Completed,
            VehicleStatus::Completed => VehicleStatus::InTransit,
        }
    }
}

/// Destination entry owned by exactly one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Id unique within the owning vehicle.
    pub id: DocId,
    /// Location name.
    pub name: String,
    /// Arrival time, `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl Destination {
    /// A blank destination with a fresh id.
    pub fn blank(id: DocId) -> Self {
        Destination {
            id,
            name: String::new(),
            time: None,
            observation: None,
        }
    }
}

// =============================================================================
// Daily status record
// =============================================================================

/// Completion state of a daily status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Still open.
    #[default]
    Pending,
    /// Closed out.
    Completed,
}

/// Flat daily status record, independent of schedules.
///
/// `qtd_pallets` is derived: it always equals the numeric sum of
/// `pallets_refrig` and `pallets_secos`, recomputed synchronously whenever
/// either sibling changes (see `fleetsync-view`), and persisted like any
/// other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusRecord {
    /// Document id, conventionally `"{date}-{millis}"`.
    pub id: DocId,
    /// Day this record belongs to.
    pub date: String,
    /// Operation kind.
    pub operation: String,
    /// Sequence number (free text).
    pub number: String,
    /// Industry / freight category.
    #[serde(rename = "industria")]
    pub industry: String,
    /// Planned time, `HH:MM`.
    pub planned_time: String,
    /// License plate.
    pub plate: String,
    /// Driver name.
    pub driver: String,
    /// Origin location name.
    pub origin: String,
    /// Destination location name.
    pub destination: String,
    /// Transport identifier (soft-referenced from schedule vehicles).
    pub transport_ref: String,
    /// Route description.
    pub route: String,
    /// Freight weight, locale-formatted (`"1.234,50"`).
    #[serde(rename = "peso")]
    pub weight: String,
    /// Box count, locale-formatted.
    pub box_count: String,
    /// Responsible person.
    pub responsible: String,
    /// Actual start time.
    pub start_time: String,
    /// Actual end time.
    pub end_time: String,
    /// Refrigerated pallet count (numeric string).
    pub pallets_refrig: String,
    /// Dry pallet count (numeric string).
    pub pallets_secos: String,
    /// Derived pallet total (numeric string).
    pub qtd_pallets: String,
    /// Separation note.
    pub separation: String,
    /// Free-text note.
    pub observation: String,
    /// Pallet receipt reference.
    pub pallet_receipt: String,
    /// CTE document number.
    pub cte: String,
    /// MDFE document number.
    pub mdfe: String,
    /// AE document number.
    pub ae: String,
    /// Departure from origin (datetime-local string).
    pub origin_departure: String,
    /// Arrival at destination (datetime-local string).
    pub dest_arrival: String,
    /// Financial report document received.
    pub doc_fin_report: bool,
    /// Pallet receipt document received.
    pub doc_pallet_receipt: bool,
    /// Protocol document received.
    pub doc_protocol: bool,
    /// Delivery receipts collected.
    pub doc_receipts: bool,
    /// Completion state.
    pub status: RecordStatus,
}

impl StatusRecord {
    /// A blank record for a day: every text field empty, flags false,
    /// status pending.
    pub fn blank(id: DocId, date: &DateKey) -> Self {
        StatusRecord {
            id,
            date: date.as_str().to_string(),
            ..StatusRecord::default()
        }
    }
}

// =============================================================================
// Registers
// =============================================================================

/// Simple named register entry (drivers, operations, industries,
/// responsibles; vehicles use the name field for the plate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRecord {
    /// Document id.
    pub id: DocId,
    /// Display name. Must be non-empty; see [`NamedRecord::validated`].
    pub name: String,
}

impl NamedRecord {
    /// Build a register entry, rejecting blank names before any write.
    pub fn validated(id: DocId, name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        Ok(NamedRecord {
            id,
            name: name.to_string(),
        })
    }
}

/// Whether a location is offered as an origin or a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// Departure point.
    Origin,
    /// Delivery point.
    Destination,
}

/// Register entry for an origin or destination location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Document id.
    pub id: DocId,
    /// Display name.
    pub name: String,
    /// Origin or destination.
    #[serde(rename = "type")]
    pub kind: LocationKind,
}

impl Location {
    /// Build a location entry, rejecting blank names before any write.
    pub fn validated(id: DocId, name: &str, kind: LocationKind) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        Ok(Location {
            id,
            name: name.to_string(),
            kind,
        })
    }
}

/// Entry of the derived `mobile-users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileUser {
    /// Document id (same as the source driver's).
    pub id: DocId,
    /// Driver name.
    pub name: String,
}

/// Project the mobile-users collection from the driver register.
pub fn mobile_users(drivers: &[NamedRecord]) -> Vec<MobileUser> {
    drivers
        .iter()
        .map(|d| MobileUser {
            id: d.id.clone(),
            name: d.name.clone(),
        })
        .collect()
}
