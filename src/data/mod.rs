pub mod candidates;
pub mod cities;
pub mod lists;
pub mod tables;

pub use self::tables::{CachedTables, DirectorySource, Table, TableSource};
