use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use cumuleo::configuration::{read_config, Settings};
use cumuleo::data::{CachedTables, DirectorySource};
use cumuleo::defs::Zipcode;
use cumuleo::newsletter::{JsonLinesRegistrar, NewsletterChoice, NewsletterRegistrar};
use cumuleo::output::{write_table, JsonOutput, OutputWriter};
use cumuleo::{resolve_list_info, run_query, summarize_all, Dataset, LocalityQuery, Result};
use num_format::{Locale, ToFormattedString};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &Settings) {
    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_tables(settings: &Settings) -> CachedTables<DirectorySource> {
    CachedTables::new(DirectorySource::new(&settings.data_dir))
}

fn load_dataset(settings: &Settings) -> Result<Arc<Dataset>> {
    Dataset::load(&open_tables(settings), &settings.tables)
}

// global flags land on whichever level they were typed at
fn global_value<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches
        .value_of(name)
        .or_else(|| matches.subcommand().1.and_then(|m| m.value_of(name)))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let settings = read_config(global_value(matches, "config").map(Path::new))?;
    init_logging(&settings);
    let output = JsonOutput::new(global_value(matches, "output").map(Path::new));

    match matches.subcommand() {
        ("subscribe", Some(m)) => {
            let registrar = JsonLinesRegistrar::new(&settings.newsletter_path);
            let newsletter = NewsletterChoice::parse(m.value_of("newsletter").unwrap_or("true"));
            let confirmation = registrar.register(m.value_of("email").unwrap_or_default(), newsletter)?;
            output.write(&confirmation)
        }
        ("zipcode", Some(m)) => {
            let dataset = load_dataset(&settings)?;
            let query = LocalityQuery::Zipcode(m.value_of("zipcode").unwrap_or_default().to_string());
            output.write(&run_query(&dataset, &query))
        }
        ("city", Some(m)) => {
            let dataset = load_dataset(&settings)?;
            let query = LocalityQuery::City {
                name: m.value_of("name").unwrap_or_default().to_string(),
                list: m.value_of("list").map(str::to_string),
            };
            output.write(&run_query(&dataset, &query))
        }
        ("list-info", Some(m)) => {
            let dataset = load_dataset(&settings)?;
            let zipcode = m.value_of("zipcode").and_then(Zipcode::parse);
            let found = resolve_list_info(&dataset.catalog, m.value_of("name").unwrap_or_default(), zipcode);
            output.write(&found)
        }
        ("summary", Some(_)) => {
            let dataset = load_dataset(&settings)?;
            let summary = summarize_all(&dataset);
            let lists: usize = summary.iter().map(|r| r.lists.len()).sum();
            info!(
                "{} localities, {} lists, {} candidates",
                summary.len().to_formatted_string(&Locale::en),
                lists.to_formatted_string(&Locale::en),
                dataset.candidates.len().to_formatted_string(&Locale::en)
            );
            output.write(&summary)
        }
        ("table", Some(m)) => {
            let name = m.value_of("name").unwrap_or_default();
            let rows = write_table(&open_tables(&settings), name, &output)?;
            info!(table = name, "{} rows", rows.to_formatted_string(&Locale::en));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn main() {
    let matches = App::new("cumuleo")
        .about("Electoral candidate lists per locality, with public mandate statistics")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .global(true)
                .help("write JSON here instead of stdout"),
        )
        .subcommand(
            SubCommand::with_name("zipcode")
                .about("lists and candidates for a postal code")
                .arg(Arg::with_name("zipcode").required(true)),
        )
        .subcommand(
            SubCommand::with_name("city")
                .about("lists and candidates for a city, or one list in detail")
                .arg(Arg::with_name("name").required(true))
                .arg(Arg::with_name("list")),
        )
        .subcommand(
            SubCommand::with_name("list-info")
                .about("metadata for a list name")
                .arg(Arg::with_name("name").required(true))
                .arg(Arg::with_name("zipcode").long("zipcode").takes_value(true)),
        )
        .subcommand(SubCommand::with_name("summary").about("grouped lists for every locality"))
        .subcommand(
            SubCommand::with_name("table")
                .about("raw rows of one data table")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(
            SubCommand::with_name("subscribe")
                .about("register an email address to the newsletter")
                .arg(Arg::with_name("email").required(true))
                .arg(
                    Arg::with_name("newsletter")
                        .long("newsletter")
                        .takes_value(true)
                        .help("true, false or a newsletter id"),
                ),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
