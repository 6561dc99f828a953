use crate::catalog::{Catalog, Dataset};
use crate::defs::{eq_ignore_case, title_case, CandidateRecord, City, Zipcode};
use crate::listinfo::{resolve_list_info, ListMatch};
use crate::zipcode::resolve_canonical_zipcode;
use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use serde_derive::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

// mandate statistics, accumulated over candidates with cumuleo data only
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_politicians: u32,
    pub total_cumuls: u32,
    pub total_years_in_politics: u32,
}

impl Totals {
    // returns the candidate's years in office, or None when the candidate
    // has no cumuleo data and so was not counted
    fn count(&mut self, candidate: &CandidateRecord) -> Option<u32> {
        if !candidate.has_cumuleo() {
            return None;
        }
        let years = candidate.political_years();
        self.total_politicians += 1;
        self.total_cumuls = self.total_cumuls.saturating_add(candidate.cumuls());
        self.total_years_in_politics += years;
        Some(years)
    }
}

// first write wins
fn set_once<T, F: FnOnce() -> Option<T>>(slot: &mut Option<T>, value: F) {
    if slot.is_none() {
        *slot = value();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListAggregate {
    pub candidates: Vec<CandidateRecord>,
    #[serde(flatten)]
    pub totals: Totals,
    pub party: Option<String>,
    #[serde(skip_serializing_if = "ListMatch::is_not_requested")]
    pub info: ListMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalityResult {
    pub city: City,
    pub lists: IndexMap<String, ListAggregate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedCandidate {
    #[serde(flatten)]
    pub record: CandidateRecord,
    // only set for candidates with cumuleo data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListDetail {
    pub name: String,
    pub zipcode: Option<Zipcode>,
    pub candidates: Vec<DetailedCandidate>,
    pub party: Option<String>,
    #[serde(skip_serializing_if = "ListMatch::is_not_requested")]
    pub info: ListMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListStats {
    #[serde(flatten)]
    pub totals: Totals,
    pub parties: IndexMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListDetailResult {
    pub city: City,
    pub list: ListDetail,
    pub stats: ListStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Locality(LocalityResult),
    List(ListDetailResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Locality {
    // city name, matched ignoring case
    City(String),
    // candidates with exactly this postal code
    Zipcode(Zipcode),
}

impl Locality {
    fn matches(&self, candidate: &CandidateRecord) -> bool {
        match self {
            Locality::City(name) => eq_ignore_case(&candidate.city, name),
            Locality::Zipcode(zipcode) => candidate.zipcode() == Some(*zipcode),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocalityQuery {
    // a postal code as typed by the user, resolved to its canonical code
    Zipcode(String),
    // with a list name the query yields that list's detail, otherwise all
    // lists of the city
    City { name: String, list: Option<String> },
}

// the locality label rendered with a result: catalog data when the postal
// code is known, otherwise just the title-cased name we saw in the data
fn locality_city(catalog: &Catalog, name: &str, zipcode: Option<Zipcode>) -> City {
    match zipcode.and_then(|z| catalog.city(z)) {
        Some(city) => {
            let mut city = city.clone();
            if city.name.is_empty() {
                city.name = title_case(name);
            }
            city
        }
        None => City {
            zipcode,
            name: title_case(name),
            attributes: IndexMap::new(),
        },
    }
}

#[derive(Default)]
struct GroupFold {
    lists: IndexMap<String, ListAggregate>,
    city: Option<String>,
    zipcode: Option<Zipcode>,
}

/// Groups the candidates of one locality by electoral list, optionally
/// keeping only the list named `list` (ignoring case).
///
/// Candidates keep dataset order within their list, and lists appear in
/// the order they are first met. List metadata is looked up once per list,
/// with the postal code of its first candidate. A list's party is the
/// first non-empty party among its candidates.
pub fn group_by_list(dataset: &Dataset, locality: &Locality, list: Option<&str>) -> LocalityResult {
    let catalog = &dataset.catalog;
    let fold = dataset
        .candidates
        .iter()
        .filter(|c| locality.matches(c))
        .filter(|c| list.map_or(true, |name| eq_ignore_case(&c.list, name)))
        .fold(GroupFold::default(), |mut acc, c| {
            set_once(&mut acc.city, || Some(c.city.clone()).filter(|s| !s.is_empty()));
            set_once(&mut acc.zipcode, || c.zipcode());
            let aggregate = acc.lists.entry(c.list.clone()).or_insert_with(|| ListAggregate {
                info: resolve_list_info(catalog, &c.list, c.zipcode()),
                ..ListAggregate::default()
            });
            aggregate.candidates.push(c.clone());
            set_once(&mut aggregate.party, || c.party().map(str::to_string));
            aggregate.totals.count(c);
            acc
        });

    let (name, zipcode) = match locality {
        Locality::City(name) => (name.to_lowercase(), fold.zipcode),
        Locality::Zipcode(zipcode) => (fold.city.unwrap_or_default(), Some(*zipcode)),
    };
    debug!(?locality, lists = fold.lists.len(), "grouped candidates");
    LocalityResult {
        city: locality_city(catalog, &name, zipcode),
        lists: fold.lists,
    }
}

// ascending ballot position; unparseable positions go last, ties keep
// dataset order (the sort is stable)
fn by_rank(a: &DetailedCandidate, b: &DetailedCandidate) -> Ordering {
    match (a.record.rank(), b.record.rank()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The candidates of one list in one city, in ballot order, with per
/// candidate years in office and a per-party breakdown of the candidates
/// holding mandates.
///
/// Unlike `group_by_list`, the list's party is taken after sorting, from
/// the best placed candidate with a party.
pub fn list_detail(dataset: &Dataset, city: &str, list: &str) -> ListDetailResult {
    let mut stats = ListStats::default();
    let mut zipcode = None;
    let mut candidates: Vec<DetailedCandidate> = dataset
        .candidates
        .iter()
        .filter(|c| eq_ignore_case(&c.city, city) && eq_ignore_case(&c.list, list))
        .map(|c| {
            set_once(&mut zipcode, || c.zipcode());
            let political_years = stats.totals.count(c);
            if political_years.is_some() {
                *stats.parties.entry(c.party.clone()).or_insert(0) += 1;
            }
            DetailedCandidate {
                record: c.clone(),
                political_years,
            }
        })
        .collect();
    candidates.sort_by(by_rank);

    let party = candidates
        .iter()
        .filter_map(|c| c.record.party())
        .next()
        .map(str::to_string);
    let name = list.to_lowercase();
    let info = resolve_list_info(&dataset.catalog, &name, zipcode);
    debug!(city, list, candidates = candidates.len(), "list detail");
    ListDetailResult {
        city: locality_city(&dataset.catalog, &city.to_lowercase(), zipcode),
        list: ListDetail {
            name,
            zipcode,
            candidates,
            party,
            info,
        },
        stats,
    }
}

fn empty_locality() -> LocalityResult {
    LocalityResult {
        city: City {
            zipcode: None,
            name: String::new(),
            attributes: IndexMap::new(),
        },
        lists: IndexMap::new(),
    }
}

pub fn run_query(dataset: &Dataset, query: &LocalityQuery) -> QueryResult {
    match query {
        LocalityQuery::Zipcode(requested) => match resolve_canonical_zipcode(dataset, requested) {
            Some(zipcode) => QueryResult::Locality(group_by_list(dataset, &Locality::Zipcode(zipcode), None)),
            None => {
                debug!(requested = requested.as_str(), "unknown locality");
                QueryResult::Locality(empty_locality())
            }
        },
        LocalityQuery::City { name, list: Some(list) } if !list.is_empty() => {
            QueryResult::List(list_detail(dataset, name, list))
        }
        LocalityQuery::City { name, .. } => {
            QueryResult::Locality(group_by_list(dataset, &Locality::City(name.clone()), None))
        }
    }
}

/// Grouped results for every postal code found in the candidate data,
/// ordered by postal code. Each code stands for itself, so every candidate
/// with a usable postal code lands in exactly one locality. Localities are
/// aggregated in parallel.
pub fn summarize_all(dataset: &Dataset) -> Vec<LocalityResult> {
    let unplaced = dataset.candidates.iter().filter(|c| c.zipcode().is_none()).count();
    if unplaced > 0 {
        warn!(unplaced, "candidates without a postal code left out of the summary");
    }
    let mut zipcodes: Vec<Zipcode> = dataset
        .candidates
        .iter()
        .filter_map(|c| c.zipcode())
        .unique()
        .collect();
    zipcodes.sort();
    zipcodes
        .par_iter()
        .map(|z| group_by_list(dataset, &Locality::Zipcode(*z), None))
        .collect()
}
