//
// Rows of the lists table: descriptive metadata per electoral list,
// keyed by its abbreviation (sigle) and optionally scoped to one postal code.
// Row order is preserved; lookups depend on it.
//

use crate::defs::{ListInfo, Row, Zipcode};
use tracing::warn;

pub fn from_row(row: &Row) -> Option<ListInfo> {
    let mut fields = row.clone();
    let sigle = fields.shift_remove("sigle").unwrap_or_default();
    if sigle.trim().is_empty() {
        return None;
    }
    let zipcode = match fields.shift_remove("zipcode") {
        Some(ref z) if !z.trim().is_empty() => Some(Zipcode::parse(z)?),
        _ => None,
    };
    Some(ListInfo {
        sigle,
        zipcode,
        fields,
    })
}

pub fn load(rows: &[Row]) -> Vec<ListInfo> {
    rows.iter()
        .filter_map(|row| {
            let info = from_row(row);
            if info.is_none() {
                warn!(?row, "skipping list without a sigle or with a malformed zipcode");
            }
            info
        })
        .collect()
}
