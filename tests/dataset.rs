use cumuleo::configuration::TableNames;
use cumuleo::data::{CachedTables, DirectorySource};
use cumuleo::defs::Zipcode;
use cumuleo::{
    canonical_zipcode, group_by_list, list_detail, resolve_canonical_zipcode, resolve_list_info, run_query, summarize_all,
    Dataset, ListMatch, Locality, LocalityQuery, QueryResult,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const CITIES: &str = "\
zipcode,city,province,region
1000,Bruxelles,Bruxelles-Capitale,Bruxelles
1050,Ixelles,Bruxelles-Capitale,Bruxelles
5000,Namur,Namur,Wallonie
";

const LISTS: &str = r##"[
  {"sigle": "ECOLO", "name": "Ecolo", "color": "#00a34a"},
  {"sigle": "LB", "zipcode": 1000, "name": "Liste du Bourgmestre"},
  {"sigle": "DéFI", "name": "Démocrate Fédéraliste Indépendant"}
]"##;

const CANDIDATES: &str = "\
firstname,lastname,city,zipcode,list,party,position,cumuleo_url,cumuls_2017,2004,2005,2006,2010,2015
Anne,Lambert,Bruxelles,1000,LB,PS,2,https://www.cumuleo.be/a,3,x,x,,,x
Bruno,Peeters,Bruxelles,1000,ECOLO,Ecolo,1,https://www.cumuleo.be/b,2,,,x,x,
Claire,Dubois,Bruxelles,1000,LB,,1,,,x,x,x,x,x
David,Janssens,Bruxelles,1000,ECOLO,Ecolo,2,https://www.cumuleo.be/d,1,,,,,x
Emma,Leroy,Bruxelles,1000,LB,PS,3,https://www.cumuleo.be/e,4,,,,x,
Fabrice,Martin,Anderlecht,1070,DéFI-Ensemble,DéFI,1,,,,,,,
Gilles,Simon,Anderlecht,1071,PTB,PTB,1,,,,,,,
Hélène,Laurent,Anderlecht,1070,PTB,PTB,2,,,,,,,
";

fn fixture() -> (TempDir, Arc<Dataset>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cities.csv"), CITIES).unwrap();
    fs::write(dir.path().join("lists.json"), LISTS).unwrap();
    fs::write(dir.path().join("candidates_with_cumuleo.csv"), CANDIDATES).unwrap();
    let tables = CachedTables::new(DirectorySource::new(dir.path()));
    let dataset = Dataset::load(&tables, &TableNames::default()).unwrap();
    (dir, dataset)
}

#[test]
fn missing_tables_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cities.csv"), CITIES).unwrap();
    let tables = CachedTables::new(DirectorySource::new(dir.path()));
    match Dataset::load(&tables, &TableNames::default()) {
        Err(cumuleo::Error::MissingTable(name)) => assert_eq!(name, "lists"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn canonical_zipcodes() {
    let (_dir, dataset) = fixture();
    for code in &["1000", "1020", "1120", "1130"] {
        assert_eq!(resolve_canonical_zipcode(&dataset, code), Some(Zipcode(1000)));
    }
    assert_eq!(resolve_canonical_zipcode(&dataset, "1050"), Some(Zipcode(1050)));
    // neither code is in the catalog; 1071 is the last Anderlecht code seen
    assert_eq!(resolve_canonical_zipcode(&dataset, "1070"), Some(Zipcode(1071)));
    assert_eq!(canonical_zipcode(&dataset, Zipcode(1075)), Some(Zipcode(1071)));
    assert_eq!(resolve_canonical_zipcode(&dataset, "6000"), None);
}

#[test]
fn list_metadata() {
    let (_dir, dataset) = fixture();
    let catalog = &dataset.catalog;
    match resolve_list_info(catalog, "ECOLO", None) {
        ListMatch::Found(info) => {
            assert!(info.sigle.eq_ignore_ascii_case("ecolo"));
            assert_eq!(info.fields["color"], "#00a34a");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(resolve_list_info(catalog, "", Some(Zipcode(1000))), ListMatch::NotRequested);
    assert_eq!(resolve_list_info(catalog, "unknown-xyz", Some(Zipcode(1000))), ListMatch::Unknown);
    let composite = resolve_list_info(catalog, "défi-ensemble", Some(Zipcode(1070)));
    assert_eq!(composite.info().unwrap().sigle, "DéFI");
}

#[test]
fn grouping_five_candidates_over_two_lists() {
    let (_dir, dataset) = fixture();
    let result = group_by_list(&dataset, &Locality::Zipcode(Zipcode(1000)), None);
    assert_eq!(result.city.name, "Bruxelles");
    assert_eq!(result.city.attributes["region"], "Bruxelles");
    assert_eq!(result.lists.len(), 2);

    let lb = &result.lists["LB"];
    assert_eq!(lb.candidates.len(), 3);
    assert_eq!(lb.totals.total_politicians, 2);
    assert_eq!(lb.totals.total_cumuls, 7);
    // Claire Dubois has five active years but no cumuleo page
    assert_eq!(lb.totals.total_years_in_politics, 4);
    assert_eq!(lb.party.as_deref(), Some("PS"));
    assert_eq!(lb.info.info().unwrap().fields["name"], "Liste du Bourgmestre");

    let ecolo = &result.lists["ECOLO"];
    assert_eq!(ecolo.totals.total_politicians, 2);
    assert_eq!(ecolo.totals.total_cumuls, 3);
    assert_eq!(ecolo.totals.total_years_in_politics, 3);
}

#[test]
fn single_list_detail() {
    let (_dir, dataset) = fixture();
    let result = list_detail(&dataset, "BRUXELLES", "lb");
    let positions: Vec<&str> = result.list.candidates.iter().map(|c| c.record.position.as_str()).collect();
    assert_eq!(positions, vec!["1", "2", "3"]);
    // the list head has no party, so the party comes from position 2
    assert_eq!(result.list.party.as_deref(), Some("PS"));
    assert_eq!(result.stats.parties["PS"], 2);
    assert_eq!(result.stats.totals.total_cumuls, 7);
    assert_eq!(result.list.candidates[1].political_years, Some(3));
    assert_eq!(result.list.candidates[0].political_years, None);
}

#[test]
fn queries_serialize_for_the_presentation_layer() {
    let (_dir, dataset) = fixture();
    let result = run_query(&dataset, &LocalityQuery::Zipcode("1130".to_string()));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["city"]["zipcode"], 1000);
    assert_eq!(json["lists"]["ECOLO"]["totalPoliticians"], 2);
    assert_eq!(json["lists"]["ECOLO"]["candidates"][0]["lastname"], "Peeters");
    assert_eq!(json["lists"]["ECOLO"]["candidates"][0]["2006"], "x");

    let anderlecht = run_query(
        &dataset,
        &LocalityQuery::City {
            name: "anderlecht".to_string(),
            list: None,
        },
    );
    match &anderlecht {
        QueryResult::Locality(result) => {
            assert_eq!(result.city.name, "Anderlecht");
            assert_eq!(result.city.zipcode, Some(Zipcode(1070)));
            assert_eq!(result.lists["PTB"].candidates.len(), 2);
            assert!(result.lists["PTB"].info == ListMatch::Unknown);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        run_query(&dataset, &LocalityQuery::Zipcode("1130".to_string())),
        result
    );
}

#[test]
fn falsy_json_cells_do_not_count() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cities.csv"), CITIES).unwrap();
    fs::write(dir.path().join("lists.json"), LISTS).unwrap();
    fs::write(
        dir.path().join("candidates_with_cumuleo.json"),
        r#"[
  {"firstname": "Iris", "lastname": "Maes", "city": "Namur", "zipcode": 5000, "list": "ECOLO",
   "party": "Ecolo", "position": 1, "cumuleo_url": false, "cumuls_2017": 2, "2004": 1, "2010": 1},
  {"firstname": "Jules", "lastname": "Wouters", "city": "Namur", "zipcode": 5000, "list": "ECOLO",
   "party": "Ecolo", "position": 2, "cumuleo_url": "https://www.cumuleo.be/j", "cumuls_2017": 0,
   "2004": false, "2005": 0, "2006": null}
]"#,
    )
    .unwrap();
    let tables = CachedTables::new(DirectorySource::new(dir.path()));
    let dataset = Dataset::load(&tables, &TableNames::default()).unwrap();

    let result = group_by_list(&dataset, &Locality::Zipcode(Zipcode(5000)), None);
    let ecolo = &result.lists["ECOLO"];
    assert_eq!(ecolo.candidates.len(), 2);
    assert_eq!(ecolo.totals.total_politicians, 1);
    assert_eq!(ecolo.totals.total_cumuls, 0);
    assert_eq!(ecolo.totals.total_years_in_politics, 0);
}

#[test]
fn summary_places_every_candidate() {
    let (_dir, dataset) = fixture();
    let summary = summarize_all(&dataset);
    let zipcodes: Vec<Option<Zipcode>> = summary.iter().map(|r| r.city.zipcode).collect();
    assert_eq!(zipcodes, vec![Some(Zipcode(1000)), Some(Zipcode(1070)), Some(Zipcode(1071))]);
    let placed: usize = summary
        .iter()
        .flat_map(|r| r.lists.values())
        .map(|l| l.candidates.len())
        .sum();
    assert_eq!(placed, dataset.candidates.len());
}
