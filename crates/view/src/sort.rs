//! Stable 3-state sorting over document snapshots
//!
//! Repeatedly selecting the same column cycles ascending → descending →
//! unsorted (back to snapshot order). Comparison policy:
//! - missing/empty values go to the end ascending, to the start descending
//! - booleans compare false < true
//! - two values that both parse as numbers compare numerically, so `"2"`
//!   sorts before `"10"`
//! - anything else compares as case-insensitive text

use fleetsync_core::Document;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Column + direction pair cycling through the 3-state toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    direction: Option<SortDirection>,
}

impl SortState {
    /// Unsorted.
    pub fn new() -> Self {
        SortState::default()
    }

    /// The active column, if sorting.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// The active direction, if sorting.
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// Select a column: a new column starts ascending; the current column
    /// cycles asc → desc → none.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            match self.direction {
                Some(SortDirection::Asc) => self.direction = Some(SortDirection::Desc),
                Some(SortDirection::Desc) | None => {
                    self.column = None;
                    self.direction = None;
                }
            }
        } else {
            self.column = Some(column.to_string());
            self.direction = Some(SortDirection::Asc);
        }
    }

    /// Apply this state to a snapshot. Unsorted state returns the records
    /// in their snapshot order.
    pub fn apply(&self, records: &[Document]) -> Vec<Document> {
        match (&self.column, self.direction) {
            (Some(column), Some(direction)) => sort_records(records, column, direction),
            _ => records.to_vec(),
        }
    }
}

/// Stable sort by one field.
pub fn sort_records(
    records: &[Document],
    field: &str,
    direction: SortDirection,
) -> Vec<Document> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Ascending-sense comparison implementing the policy above.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a_empty = is_empty(a);
    let b_empty = is_empty(b);
    match (a_empty, b_empty) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater, // empties to the end
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    if let (Value::Bool(x), Value::Bool(y)) = (a, b) {
        return x.cmp(y); // false < true
    }

    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    text_of(a).to_lowercase().cmp(&text_of(b).to_lowercase())
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
