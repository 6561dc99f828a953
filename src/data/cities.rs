//
// Rows of the cities table: one locality per postal code.
//

use crate::defs::{City, Row, Zipcode};
use tracing::warn;

pub fn from_row(row: &Row) -> Option<City> {
    let mut attributes = row.clone();
    let zipcode = attributes
        .shift_remove("zipcode")
        .and_then(|z| Zipcode::parse(&z))?;
    let name = match attributes.shift_remove("name") {
        Some(name) => name,
        None => attributes.shift_remove("city").unwrap_or_default(),
    };
    Some(City {
        zipcode: Some(zipcode),
        name,
        attributes,
    })
}

pub fn load(rows: &[Row]) -> Vec<City> {
    rows.iter()
        .filter_map(|row| {
            let city = from_row(row);
            if city.is_none() {
                warn!(?row, "skipping city without a usable zipcode");
            }
            city
        })
        .collect()
}
