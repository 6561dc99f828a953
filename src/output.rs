use crate::data::{CachedTables, TableSource};
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait OutputWriter {
    fn write<T: Serialize>(&self, value: &T) -> Result<()>;
}

// pretty-printed JSON, to a file or to stdout
pub struct JsonOutput {
    path: Option<PathBuf>,
}

impl JsonOutput {
    pub fn new(path: Option<&Path>) -> JsonOutput {
        JsonOutput {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl OutputWriter for JsonOutput {
    fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        match &self.path {
            Some(path) => {
                let mut fd = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(&mut fd, value)?;
                writeln!(fd)?;
                fd.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                serde_json::to_writer_pretty(&mut lock, value)?;
                writeln!(lock)?;
            }
        }
        Ok(())
    }
}

/// Writes the rows of one table, as the cache hands them out, and returns
/// how many there were.
pub fn write_table<S: TableSource, W: OutputWriter>(tables: &CachedTables<S>, name: &str, output: &W) -> Result<usize> {
    let table = tables.table(name)?;
    output.write(&*table)?;
    Ok(table.len())
}
