//! Identifiers and collection tags
//!
//! - Collection: the named record collections the application works with
//! - DocId: opaque client-assigned document identifier
//! - DateKey: validated `YYYY-MM-DD` day key used for date-scoped feeds

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Collection
// =============================================================================

/// Tag for the named collections of the dispatch data model.
///
/// Collections hold loosely-typed records keyed by [`DocId`].
/// `Schedules` and `DailyStatus` are day-scoped: their feeds are normally
/// filtered by an equality match on the denormalized `date` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Registered drivers
    Drivers,
    /// Registered vehicle plates
    Vehicles,
    /// Origins and destinations
    Locations,
    /// Operation kinds
    Operations,
    /// Industries (freight categories)
    Industries,
    /// Responsible persons
    Responsibles,
    /// Daily schedule aggregates (own their vehicles by containment)
    Schedules,
    /// Flat daily status records
    DailyStatus,
    /// Read-only projection of drivers for the mobile app
    MobileUsers,
}

impl Collection {
    /// All collections, in registration order.
    pub const ALL: [Collection; 9] = [
        Collection::Drivers,
        Collection::Vehicles,
        Collection::Locations,
        Collection::Operations,
        Collection::Industries,
        Collection::Responsibles,
        Collection::Schedules,
        Collection::DailyStatus,
        Collection::MobileUsers,
    ];

    /// Stable wire name of the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Drivers => "drivers",
            Collection::Vehicles => "vehicles",
            Collection::Locations => "locations",
            Collection::Operations => "operations",
            Collection::Industries => "industries",
            Collection::Responsibles => "responsibles",
            Collection::Schedules => "schedules",
            Collection::DailyStatus => "daily-status",
            Collection::MobileUsers => "mobile-users",
        }
    }

    /// Whether feeds over this collection are normally filtered by day.
    pub fn is_date_scoped(&self) -> bool {
        matches!(self, Collection::Schedules | Collection::DailyStatus)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

// =============================================================================
// DocId
// =============================================================================

/// Opaque document identifier.
///
/// Ids are assigned client-side (see [`crate::id`]) and are immutable once
/// a document has been created. Uniqueness within a containing scope is a
/// convention of generation, not something any store enforces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        DocId(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        DocId(s)
    }
}

// =============================================================================
// DateKey
// =============================================================================

/// Validated `YYYY-MM-DD` day key.
///
/// Date-scoped feeds filter server-side by string equality on this value,
/// never by range query, so the denormalized representation is the contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Day key for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.format("%Y-%m-%d").to_string())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse back into a calendar date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DateKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateKey::from_date)
            .map_err(|_| format!("invalid date key: {s}"))
    }
}
