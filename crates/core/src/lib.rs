//! Core types for the fleetsync document model
//!
//! This crate defines the foundational pieces used throughout the system:
//! - Collection: tag for the named record collections
//! - DocId / DateKey: opaque document identifiers and day keys
//! - Document: the dynamic keyed record representation
//! - Error: error type hierarchy
//! - NodePath / EditOp / edit: the pure nested-path editor
//! - Typed entity models (Schedule, Vehicle, Destination, StatusRecord, ...)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod edit;
pub mod error;
pub mod id;
pub mod model;
pub mod types;

pub use document::{Document, Fields};
pub use edit::{edit, edit_with, EditOp, NodePath, Step};
pub use error::{Error, Result};
pub use id::now_millis;
pub use model::{
    mobile_users, Destination, Location, LocationKind, MobileUser, NamedRecord, RecordStatus,
    Schedule, StatusRecord, Vehicle, VehicleStatus,
};
pub use types::{Collection, DateKey, DocId};
