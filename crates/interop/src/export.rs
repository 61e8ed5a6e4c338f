//! Spreadsheet row mapping
//!
//! The export collaborator consumes the derived view's current (sorted,
//! filtered) record set plus an ordered field→label mapping, and produces
//! one ordered label→text mapping per record. Writing the actual
//! spreadsheet file is someone else's job; the contract here is a plain
//! mapping-per-record sequence with a stable column order.

use fleetsync_core::{Document, Schedule};
use indexmap::IndexMap;
use serde_json::Value;

/// One export column: the document field to read and the header label to
/// emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    /// Document field name.
    pub key: String,
    /// Column header label.
    pub label: String,
}

impl ExportColumn {
    /// Shorthand constructor.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        ExportColumn {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Render a field value as a cell.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Map a record set through an ordered column mapping.
pub fn rows(records: &[Document], columns: &[ExportColumn]) -> Vec<IndexMap<String, String>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| (column.label.clone(), cell(record.get(&column.key))))
                .collect()
        })
        .collect()
}

/// The canonical daily-status export mapping, in table column order.
pub fn status_columns() -> Vec<ExportColumn> {
    [
        ("operation", "Operation"),
        ("number", "No."),
        ("industria", "Industry"),
        ("plannedTime", "Planned time"),
        ("plate", "Plate"),
        ("driver", "Driver"),
        ("origin", "Origin"),
        ("destination", "Destination"),
        ("transportRef", "Transport ref"),
        ("route", "Route"),
        ("peso", "Weight"),
        ("boxCount", "Boxes"),
        ("responsible", "Responsible"),
        ("startTime", "Start"),
        ("endTime", "End"),
        ("palletsRefrig", "Refrig. pallets"),
        ("palletsSecos", "Dry pallets"),
        ("qtdPallets", "Total pallets"),
        ("separation", "Separation"),
        ("observation", "Observation"),
        ("palletReceipt", "Pallet receipt"),
        ("cte", "CTE"),
        ("mdfe", "MDFE"),
        ("ae", "AE"),
        ("originDeparture", "Origin departure"),
        ("destArrival", "Destination arrival"),
        ("docFinReport", "Fin. report doc"),
        ("docPalletReceipt", "Pallet receipt doc"),
        ("docProtocol", "Protocol doc"),
        ("docReceipts", "Receipts doc"),
        ("status", "Status"),
        ("date", "Date"),
    ]
    .into_iter()
    .map(|(key, label)| ExportColumn::new(key, label))
    .collect()
}

/// Flatten schedules into one export row per vehicle, destinations
/// joined with `"; "`.
pub fn schedule_rows(schedules: &[Schedule]) -> Vec<IndexMap<String, String>> {
    let join = |parts: Vec<String>| parts.join("; ");
    schedules
        .iter()
        .flat_map(|schedule| {
            schedule.vehicles.iter().map(move |vehicle| {
                let mut row = IndexMap::new();
                row.insert("Schedule".to_string(), schedule.name.clone());
                row.insert("Date".to_string(), schedule.date.as_str().to_string());
                row.insert("Plate".to_string(), vehicle.plate.clone());
                row.insert("Driver".to_string(), vehicle.driver.clone());
                row.insert("Origin".to_string(), vehicle.origin.clone());
                row.insert("Origin time".to_string(), vehicle.origin_time.clone());
                row.insert(
                    "Destinations".to_string(),
                    join(vehicle
                        .destinations
                        .iter()
                        .map(|d| d.name.clone())
                        .collect()),
                );
                row.insert(
                    "Destination times".to_string(),
                    join(vehicle
                        .destinations
                        .iter()
                        .map(|d| d.time.clone().unwrap_or_default())
                        .collect()),
                );
                row.insert(
                    "Observations".to_string(),
                    join(vehicle
                        .destinations
                        .iter()
                        .map(|d| d.observation.clone().unwrap_or_default())
                        .collect()),
                );
                row.insert(
                    "Transport refs".to_string(),
                    vehicle.transport_refs.join("; "),
                );
                row.insert(
                    "Status".to_string(),
                    match vehicle.status {
                        fleetsync_core::VehicleStatus::InTransit => "InTransit".to_string(),
                        fleetsync_core::VehicleStatus::Completed => "Completed".to_string(),
                    },
                );
                row
            })
        })
        .collect()
}
