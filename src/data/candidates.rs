//
// Rows of the candidates_with_cumuleo table, one per candidate on a ballot.
// Columns we know about become typed fields; everything else (notably the
// per-year mandate columns "2004" .. "2015") is kept verbatim.
//

use crate::defs::{CandidateRecord, Row};
use std::collections::BTreeSet;

fn take(row: &mut Row, column: &str) -> String {
    row.shift_remove(column).unwrap_or_default()
}

// a year column is active when it holds anything at all
fn active_years(row: &Row) -> BTreeSet<u16> {
    row.iter()
        .filter(|(column, value)| column.len() == 4 && !value.is_empty())
        .filter_map(|(column, _)| column.parse::<u16>().ok())
        .collect()
}

pub fn from_row(row: &Row) -> CandidateRecord {
    let mut extra = row.clone();
    let cumuleo_url = Some(take(&mut extra, "cumuleo_url")).filter(|url| !url.is_empty());
    CandidateRecord {
        firstname: take(&mut extra, "firstname"),
        lastname: take(&mut extra, "lastname"),
        city: take(&mut extra, "city"),
        zipcode: take(&mut extra, "zipcode"),
        list: take(&mut extra, "list"),
        party: take(&mut extra, "party"),
        position: take(&mut extra, "position"),
        cumuleo_url,
        cumuls_2017: take(&mut extra, "cumuls_2017"),
        active_years: active_years(row),
        extra,
    }
}

pub fn load(rows: &[Row]) -> Vec<CandidateRecord> {
    rows.iter().map(from_row).collect()
}
