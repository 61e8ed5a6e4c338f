//! Error types for fleetsync
//!
//! One error enum covers the whole system. We use `thiserror` for automatic
//! `Display` and `Error` trait implementations. The variants follow the
//! failure taxonomy of the sync core: subscription failures are persistent
//! (the consumer decides whether to resubscribe), write failures roll the
//! optimistic state back, and validation failures are caught before any
//! write is attempted.

use crate::types::{Collection, DocId};
use thiserror::Error;

/// Result type alias for fleetsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the fleetsync core
///
/// All variants are cloneable so the last error can be retained and
/// surfaced by a session while the underlying state keeps moving.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A change feed could not attach, or the live subscription dropped
    #[error("subscription failed: {0}")]
    Subscription(String),

    /// The backend could not be reached for a mutation
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a mutation for lack of permission
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A mutation or read addressed a document that does not exist
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection the document was looked up in
        collection: Collection,
        /// Identifier that failed to resolve
        id: DocId,
    },

    /// Input failed validation before any write was attempted
    #[error("validation failed: {0}")]
    Validation(String),

    /// A document could not be converted to or from its typed form
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// True for errors produced by a rejected or undeliverable mutation.
    ///
    /// These are the failures that roll back an optimistic edit; they are
    /// surfaced transiently, unlike [`Error::Subscription`] which is a
    /// persistent feed state.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Error::Unavailable(_) | Error::PermissionDenied(_) | Error::NotFound { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
