//! Client-side identifier generation
//!
//! Documents are created with a fresh id before the first write reaches the
//! backend, so id assignment happens on the client. Ids are millisecond
//! timestamps made strictly monotonic within the process: two calls in the
//! same millisecond never collide, and later calls always compare greater.
//! That is "monotonic-enough" for the data model's uniqueness convention;
//! nothing downstream depends on ids being dense or globally ordered.

use crate::types::{DateKey, DocId};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

static LAST_TOKEN: Lazy<Mutex<i64>> = Lazy::new(|| Mutex::new(0));

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Also used by the mutation gateway to stamp `updatedAt`.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Next monotonic millisecond token.
///
/// Returns the current wall clock, bumped past the previously issued token
/// when the clock has not advanced (or has gone backwards).
fn next_token() -> i64 {
    let mut last = LAST_TOKEN.lock();
    let token = now_millis().max(*last + 1);
    *last = token;
    token
}

impl DocId {
    /// Generate a fresh process-unique identifier.
    pub fn generate() -> DocId {
        DocId::new(next_token().to_string())
    }

    /// Generate a fresh identifier prefixed with a day key.
    ///
    /// Used for daily status records, whose ids carry their date
    /// (`"2024-08-01-1722470400000"`).
    pub fn generate_for(date: &DateKey) -> DocId {
        DocId::new(format!("{}-{}", date.as_str(), next_token()))
    }
}
