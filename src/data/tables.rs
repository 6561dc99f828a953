//
// Raw table access. A table is an ordered sequence of rows, each row an
// ordered column -> value map. Tables live in one directory as
// <name>.csv, <name>.csv.gz or <name>.json (an array of flat objects).
//

use crate::defs::Row;
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub type Table = Arc<Vec<Row>>;

pub trait TableSource {
    fn load_table(&self, name: &str) -> Result<Vec<Row>>;
}

pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirectorySource {
        DirectorySource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSource for DirectorySource {
    fn load_table(&self, name: &str) -> Result<Vec<Row>> {
        // a bare table name, never a path out of the data directory
        if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name.starts_with('.') {
            return Err(Error::MissingTable(name.to_string()));
        }
        let csv_path = self.dir.join(format!("{}.csv", name));
        if csv_path.is_file() {
            debug!(path = %csv_path.display(), "reading table");
            return read_csv(File::open(&csv_path)?);
        }
        let gz_path = self.dir.join(format!("{}.csv.gz", name));
        if gz_path.is_file() {
            debug!(path = %gz_path.display(), "reading compressed table");
            return read_csv(GzDecoder::new(File::open(&gz_path)?));
        }
        let json_path = self.dir.join(format!("{}.json", name));
        if json_path.is_file() {
            debug!(path = %json_path.display(), "reading table");
            return read_json(BufReader::new(File::open(&json_path)?));
        }
        Err(Error::MissingTable(name.to_string()))
    }
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut rows: Vec<Row> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // short rows simply lack the trailing columns
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// cells are strings, and an empty string is the only falsy one; so JSON
// null, false and zero all become ""
fn json_cell(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => String::new(),
        other => other.to_string(),
    }
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<Row>> {
    let objects: Vec<IndexMap<String, Value>> = serde_json::from_reader(reader)?;
    Ok(objects
        .into_iter()
        .map(|object| object.into_iter().map(|(k, v)| (k, json_cell(v))).collect())
        .collect())
}

/// Loads each table at most once per process and hands out shared snapshots.
///
/// Callers racing on a table that is still loading wait for that one load
/// rather than starting their own. A failed load leaves nothing behind, so
/// the next call tries again.
pub struct CachedTables<S> {
    source: S,
    tables: Mutex<HashMap<String, Arc<OnceCell<Table>>>>,
}

impl<S: TableSource> CachedTables<S> {
    pub fn new(source: S) -> CachedTables<S> {
        CachedTables {
            source,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn table(&self, name: &str) -> Result<Table> {
        let cell = {
            let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
            tables
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        let table = cell.get_or_try_init(|| -> Result<Table> {
            let rows = self.source.load_table(name)?;
            info!(table = name, rows = rows.len(), "loaded table");
            Ok(Arc::new(rows))
        })?;
        Ok(Arc::clone(table))
    }
}
