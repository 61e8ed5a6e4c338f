//! Client-side derived views
//!
//! Read-only transforms over a store snapshot: stable 3-state sorting
//! with numeric-aware comparison, write-time computed fields (pallet
//! totals), and aggregation over locale-formatted numeric strings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod compute;
pub mod sort;

pub use aggregate::{
    fleet_counts, format_decimal_br, parse_locale_decimal, sum_by_category, sum_selected,
    FleetCounts, Selection,
};
pub use compute::{live_pallet_total, pallet_patch, pallet_total};
pub use sort::{sort_records, SortDirection, SortState};
