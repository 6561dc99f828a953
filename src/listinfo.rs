//
// List metadata lookup: from the list name printed on a candidate row to
// the descriptive record in the list catalog.
//

use crate::catalog::Catalog;
use crate::defs::{eq_ignore_case, ListInfo, Zipcode};
use tracing::debug;

// outcome of a list metadata lookup. a name that was given but matched
// nothing is kept apart from no name at all: the former serializes as
// null, the latter is left out of the output
#[derive(Debug, Clone, PartialEq)]
pub enum ListMatch {
    NotRequested,
    Unknown,
    Found(ListInfo),
}

impl ListMatch {
    pub fn is_not_requested(&self) -> bool {
        *self == ListMatch::NotRequested
    }

    pub fn info(&self) -> Option<&ListInfo> {
        match self {
            ListMatch::Found(info) => Some(info),
            _ => None,
        }
    }
}

impl Default for ListMatch {
    fn default() -> ListMatch {
        ListMatch::NotRequested
    }
}

impl serde::Serialize for ListMatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListMatch::Found(info) => info.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// Finds the metadata for `list_name`, searching the catalog in its stored
/// order in two passes:
///
/// 1. exact: the first entry whose sigle equals the name (ignoring case)
///    and which is either unscoped or scoped to `zipcode`;
/// 2. partial: the first entry whose sigle occurs inside the name
///    (ignoring case), whatever its scope. This catches composite names
///    such as "ECOLO-GROEN".
///
/// An exact match anywhere in the catalog beats every partial match.
pub fn resolve_list_info(catalog: &Catalog, list_name: &str, zipcode: Option<Zipcode>) -> ListMatch {
    if list_name.is_empty() {
        return ListMatch::NotRequested;
    }
    let lists = catalog.lists();
    let exact = lists
        .iter()
        .find(|list| eq_ignore_case(&list.sigle, list_name) && list.applies_to(zipcode));
    let found = exact.or_else(|| {
        let name = list_name.to_lowercase();
        lists
            .iter()
            .find(|list| name.contains(&list.sigle.to_lowercase()))
    });
    debug!(list_name, ?zipcode, found = ?found.map(|l| &l.sigle), "list metadata");
    match found {
        Some(info) => ListMatch::Found(info.clone()),
        None => ListMatch::Unknown,
    }
}
