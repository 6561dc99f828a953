//
// Canonical postal codes: the code under which the candidate data for a
// requested locality is actually filed.
//

use crate::catalog::Dataset;
use crate::defs::Zipcode;
use itertools::Itertools;
use tracing::debug;

// Bruxelles-ville and its historical sub-municipalities (Laeken, Neder-Over-
// Heembeek, Haren) are all filed under 1000
const BRUSSELS: Zipcode = Zipcode(1000);
const BRUSSELS_CODES: [Zipcode; 4] = [Zipcode(1000), Zipcode(1020), Zipcode(1120), Zipcode(1130)];

/// Canonical code for `requested`, or None for an unknown locality.
///
/// Rules, first hit wins: the Brussels sub-municipalities map to 1000; a
/// code known to the city catalog is its own canonical code; otherwise the
/// distinct candidate postal codes are scanned in dataset order and the
/// *last* one in the same postal district (all digits but the last) is
/// taken.
pub fn canonical_zipcode(dataset: &Dataset, requested: Zipcode) -> Option<Zipcode> {
    if BRUSSELS_CODES.contains(&requested) {
        return Some(BRUSSELS);
    }
    if dataset.catalog.contains_zipcode(requested) {
        return Some(requested);
    }
    let district = requested.district();
    let found = dataset
        .candidates
        .iter()
        .filter_map(|c| c.zipcode())
        .unique()
        .filter(|z| z.district() == district)
        .last();
    debug!(%requested, ?found, "district fallback");
    found
}

// as canonical_zipcode, from user input; input that is not a number is an
// unknown locality
pub fn resolve_canonical_zipcode(dataset: &Dataset, requested: &str) -> Option<Zipcode> {
    canonical_zipcode(dataset, Zipcode::parse(requested)?)
}
