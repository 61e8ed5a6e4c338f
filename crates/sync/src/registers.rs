//! Register collection operations
//!
//! Drivers, vehicle plates, operations, industries, responsibles and
//! locations share one simple flow: validate the name at the staging
//! boundary (a blank name never reaches the gateway), then create, patch
//! or remove through the session.

use crate::session::LiveCollection;
use fleetsync_core::{
    DateKey, DocId, Document, Error, Location, LocationKind, NamedRecord, Result, StatusRecord,
};
use serde_json::Value;

/// Create a named register entry (driver, plate, operation, industry,
/// responsible).
pub fn add_named(live: &LiveCollection, name: &str) -> Result<DocId> {
    let record = NamedRecord::validated(DocId::generate(), name)?;
    let id = record.id.clone();
    live.create(Document::from_typed(&record)?)?;
    Ok(id)
}

/// Rename a register entry.
pub fn rename_named(live: &LiveCollection, id: &DocId, name: &str) -> Result<u64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }
    let mut fields = fleetsync_core::Fields::new();
    fields.insert("name".to_string(), Value::from(name));
    live.patch(id, fields)
}

/// Create a location register entry.
pub fn add_location(live: &LiveCollection, name: &str, kind: LocationKind) -> Result<DocId> {
    let location = Location::validated(DocId::generate(), name, kind)?;
    let id = location.id.clone();
    live.create(Document::from_typed(&location)?)?;
    Ok(id)
}

/// Delete a register entry.
pub fn remove_record(live: &LiveCollection, id: &DocId) -> Result<u64> {
    live.remove(id)
}

/// Create a blank daily status record for a day, returning its id.
pub fn add_status_record(live: &LiveCollection, date: &DateKey) -> Result<DocId> {
    let record = StatusRecord::blank(DocId::generate_for(date), date);
    let id = record.id.clone();
    live.create(Document::from_typed(&record)?)?;
    Ok(id)
}
