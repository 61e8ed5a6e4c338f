//! Aggregation over locale-formatted numeric strings
//!
//! Weights arrive as pt-BR formatted strings (`"1.234,50"`: thousands
//! dot, decimal comma). Aggregation parses them, groups by a categorical
//! field, and sums per category; a second mode sums over an explicit
//! selection of record ids owned by the consumer (the checkbox column).

use fleetsync_core::{DocId, Document, Schedule, VehicleStatus};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Parse a locale-formatted decimal (`"4.965,30"` → 4965.30).
/// Unparseable input counts as zero.
pub fn parse_locale_decimal(s: &str) -> f64 {
    s.trim()
        .replace('.', "")
        .replace(',', ".")
        .parse()
        .unwrap_or(0.0)
}

/// Format a decimal back into the locale shape, two places
/// (`2000.0` → `"2.000,00"`).
pub fn format_decimal_br(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}{grouped},{frac:02}", if negative { "-" } else { "" })
}

/// Sum a numeric field per category, in first-seen category order.
/// Records with an empty category are skipped.
pub fn sum_by_category(
    records: &[Document],
    value_field: &str,
    category_field: &str,
) -> IndexMap<String, f64> {
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let Some(category) = record.get_str(category_field) else {
            continue;
        };
        if category.is_empty() {
            continue;
        }
        let value = parse_locale_decimal(record.get_str(value_field).unwrap_or(""));
        *sums.entry(category.to_string()).or_insert(0.0) += value;
    }
    sums
}

/// Externally-owned selection of record ids (the PESO checkbox column).
/// The selection lives outside the data and survives snapshot swaps.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<DocId>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Selection::default()
    }

    /// Flip one record in or out of the selection.
    pub fn toggle(&mut self, id: &DocId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Whether a record is selected.
    pub fn contains(&self, id: &DocId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop the whole selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Sum a numeric field over the selected records only.
pub fn sum_selected(records: &[Document], selection: &Selection, value_field: &str) -> f64 {
    records
        .iter()
        .filter(|r| selection.contains(r.id()))
        .map(|r| parse_locale_decimal(r.get_str(value_field).unwrap_or("")))
        .sum()
}

/// Vehicle counts for a day's schedules: (programmed, in transit,
/// completed). Dashboard header numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetCounts {
    /// All vehicles across the day's schedules.
    pub programmed: usize,
    /// Vehicles still on the road.
    pub in_transit: usize,
    /// Vehicles that finished their run.
    pub completed: usize,
}

/// Count vehicles per status across schedules.
pub fn fleet_counts(schedules: &[Schedule]) -> FleetCounts {
    let mut counts = FleetCounts {
        programmed: 0,
        in_transit: 0,
        completed: 0,
    };
    for vehicle in schedules.iter().flat_map(|s| s.vehicles.iter()) {
        counts.programmed += 1;
        match vehicle.status {
            VehicleStatus::InTransit => counts.in_transit += 1,
            VehicleStatus::Completed => counts.completed += 1,
        }
    }
    counts
}
