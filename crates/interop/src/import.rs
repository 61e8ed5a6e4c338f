//! Clipboard-paste tabular import
//!
//! Users paste spreadsheet rows as tab-separated text. The first line is
//! a header and is discarded; every later line with at least four fields
//! becomes one staged record. Malformed lines are silently skipped, not
//! rejected — partial pastes are normal. Staged records only become
//! daily-status documents after explicit confirmation.

use fleetsync_core::{DateKey, DocId, StatusRecord};
use serde::{Deserialize, Serialize};

/// One parsed paste row, staged for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Transport identifier.
    pub transport_ref: String,
    /// Route description.
    pub route: String,
    /// Weight, locale-formatted string.
    pub weight: String,
    /// Box count, locale-formatted string.
    pub box_count: String,
}

/// Parse pasted tab-separated text into staged records.
pub fn parse_tabular(input: &str) -> Vec<ImportRecord> {
    input
        .trim()
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 4 {
                return None;
            }
            Some(ImportRecord {
                transport_ref: columns[0].trim().to_string(),
                route: columns[1].trim().to_string(),
                weight: columns[2].trim().to_string(),
                box_count: columns[3].trim().to_string(),
            })
        })
        .collect()
}

/// Turn confirmed staged records into blank daily-status records for a
/// day, each with a fresh date-prefixed id and the four imported fields
/// filled in.
pub fn stage_status_records(date: &DateKey, rows: &[ImportRecord]) -> Vec<StatusRecord> {
    rows.iter()
        .map(|row| {
            let mut record = StatusRecord::blank(DocId::generate_for(date), date);
            record.transport_ref = row.transport_ref.clone();
            record.route = row.route.clone();
            record.weight = row.weight.clone();
            record.box_count = row.box_count.clone();
            record
        })
        .collect()
}
