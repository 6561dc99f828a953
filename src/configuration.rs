use crate::error::{Error, Result};
use serde_derive::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Tables {
    candidates: Option<String>,
    cities: Option<String>,
    lists: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Newsletter {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Config {
    data_dir: Option<String>,
    log_filter: Option<String>,
    #[serde(default)]
    tables: Tables,
    #[serde(default)]
    newsletter: Newsletter,
}

fn config_contents(input_file: &Path) -> Result<Config> {
    let mut fd = File::open(input_file).map_err(|e| {
        Error::Config(format!("unable to read {}: {}", input_file.display(), e))
    })?;

    let mut buf = String::new();
    fd.read_to_string(&mut buf)?;

    let config: Config = toml::from_str(&buf)?;
    Ok(config)
}

// names of the source tables, without extension
#[derive(Debug, Clone, PartialEq)]
pub struct TableNames {
    pub candidates: String,
    pub cities: String,
    pub lists: String,
}

impl Default for TableNames {
    fn default() -> TableNames {
        TableNames {
            candidates: "candidates_with_cumuleo".to_string(),
            cities: "cities".to_string(),
            lists: "lists".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub tables: TableNames,
    pub newsletter_path: PathBuf,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            data_dir: PathBuf::from("data"),
            tables: TableNames::default(),
            newsletter_path: PathBuf::from("newsletter.jsonl"),
            log_filter: "cumuleo=info".to_string(),
        }
    }
}

/// Reads settings from a TOML file. Every key is optional; relative paths
/// are taken from the directory holding the file. Without a file the
/// defaults apply, relative to the working directory.
pub fn read_config(input_file: Option<&Path>) -> Result<Settings> {
    let defaults = Settings::default();
    let fname = match input_file {
        Some(fname) => fname,
        None => return Ok(defaults),
    };
    let config = config_contents(fname)?;
    let dir = fname.parent().unwrap_or_else(|| Path::new(""));
    let in_dir = |s: Option<String>, default: PathBuf| -> PathBuf {
        match s {
            Some(s) => dir.join(s),
            None => dir.join(default),
        }
    };

    let tables = TableNames {
        candidates: config.tables.candidates.unwrap_or(defaults.tables.candidates),
        cities: config.tables.cities.unwrap_or(defaults.tables.cities),
        lists: config.tables.lists.unwrap_or(defaults.tables.lists),
    };
    Ok(Settings {
        data_dir: in_dir(config.data_dir, defaults.data_dir),
        tables,
        newsletter_path: in_dir(config.newsletter.path, defaults.newsletter_path),
        log_filter: config.log_filter.unwrap_or(defaults.log_filter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_defaults() {
        let settings = read_config(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tables.candidates, "candidates_with_cumuleo");
    }

    #[test]
    fn paths_are_relative_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let fname = dir.path().join("cumuleo.toml");
        std::fs::write(
            &fname,
            "data_dir = \"csv\"\n\
             log_filter = \"cumuleo=debug\"\n\
             [tables]\n\
             candidates = \"candidates_2018\"\n",
        )
        .unwrap();
        let settings = read_config(Some(&fname)).unwrap();
        assert_eq!(settings.data_dir, dir.path().join("csv"));
        assert_eq!(settings.newsletter_path, dir.path().join("newsletter.jsonl"));
        assert_eq!(settings.tables.candidates, "candidates_2018");
        assert_eq!(settings.tables.cities, "cities");
        assert_eq!(settings.log_filter, "cumuleo=debug");
    }

    #[test]
    fn bad_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_config(Some(&dir.path().join("missing.toml"))).is_err());
        let fname = dir.path().join("bad.toml");
        std::fs::write(&fname, "datadir = \"csv\"\n").unwrap();
        match read_config(Some(&fname)) {
            Err(Error::Toml(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
