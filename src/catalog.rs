use crate::configuration::TableNames;
use crate::data::{self, CachedTables, TableSource};
use crate::defs::{CandidateRecord, City, ListInfo, Zipcode};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

// the immutable reference tables: cities by postal code, list metadata in
// catalog order
#[derive(Debug, Default)]
pub struct Catalog {
    cities: Vec<City>,
    by_zipcode: HashMap<Zipcode, usize>,
    lists: Vec<ListInfo>,
}

impl Catalog {
    pub fn new(cities: Vec<City>, lists: Vec<ListInfo>) -> Catalog {
        let mut by_zipcode = HashMap::new();
        for (idx, city) in cities.iter().enumerate() {
            if let Some(zipcode) = city.zipcode {
                // first entry for a code wins
                by_zipcode.entry(zipcode).or_insert(idx);
            }
        }
        Catalog {
            cities,
            by_zipcode,
            lists,
        }
    }

    pub fn city(&self, zipcode: Zipcode) -> Option<&City> {
        self.by_zipcode.get(&zipcode).map(|idx| &self.cities[*idx])
    }

    pub fn contains_zipcode(&self, zipcode: Zipcode) -> bool {
        self.by_zipcode.contains_key(&zipcode)
    }

    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn lists(&self) -> &[ListInfo] {
        &self.lists
    }
}

// everything the engine reads, loaded once and never modified
#[derive(Debug, Default)]
pub struct Dataset {
    pub catalog: Catalog,
    pub candidates: Vec<CandidateRecord>,
}

impl Dataset {
    pub fn new(catalog: Catalog, candidates: Vec<CandidateRecord>) -> Dataset {
        Dataset {
            catalog,
            candidates,
        }
    }

    pub fn load<S: TableSource>(tables: &CachedTables<S>, names: &TableNames) -> Result<Arc<Dataset>> {
        let cities = data::cities::load(&tables.table(&names.cities)?);
        let lists = data::lists::load(&tables.table(&names.lists)?);
        let candidates = data::candidates::load(&tables.table(&names.candidates)?);
        info!(
            cities = cities.len(),
            lists = lists.len(),
            candidates = candidates.len(),
            "dataset ready"
        );
        Ok(Arc::new(Dataset::new(Catalog::new(cities, lists), candidates)))
    }
}
