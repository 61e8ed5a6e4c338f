//! Write-time computed fields
//!
//! `qtdPallets` always equals the numeric sum of `palletsRefrig` and
//! `palletsSecos`. The recomputation happens synchronously at the edit
//! staging boundary — whenever either sibling changes, the patch carries
//! the fresh total — and the result is persisted like any other field.
//! For live display, [`live_pallet_total`] recomputes from the current
//! siblings so the shown value can never diverge from a stale stored one.

use fleetsync_core::{Document, Fields};
use serde_json::Value;

/// Wire name of the refrigerated pallet count.
pub const PALLETS_REFRIG: &str = "palletsRefrig";
/// Wire name of the dry pallet count.
pub const PALLETS_SECOS: &str = "palletsSecos";
/// Wire name of the derived total.
pub const QTD_PALLETS: &str = "qtdPallets";

/// Parse a pallet count; anything non-numeric counts as zero.
fn parse_count(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

/// The derived total for a pair of pallet counts.
pub fn pallet_total(refrig: &str, secos: &str) -> String {
    (parse_count(refrig) + parse_count(secos)).to_string()
}

/// Recompute the total from a document's current siblings (live display).
pub fn live_pallet_total(doc: &Document) -> String {
    pallet_total(
        doc.get_str(PALLETS_REFRIG).unwrap_or(""),
        doc.get_str(PALLETS_SECOS).unwrap_or(""),
    )
}

/// Build the patch for one status-record field edit.
///
/// A plain field yields a single-entry patch. Editing either pallet
/// sibling additionally carries the recomputed `qtdPallets`, taking the
/// other sibling from the current document.
pub fn pallet_patch(doc: &Document, field: &str, value: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field.to_string(), Value::from(value));

    if field == PALLETS_REFRIG || field == PALLETS_SECOS {
        let refrig = if field == PALLETS_REFRIG {
            value
        } else {
            doc.get_str(PALLETS_REFRIG).unwrap_or("")
        };
        let secos = if field == PALLETS_SECOS {
            value
        } else {
            doc.get_str(PALLETS_SECOS).unwrap_or("")
        };
        fields.insert(QTD_PALLETS.to_string(), Value::from(pallet_total(refrig, secos)));
    }
    fields
}
