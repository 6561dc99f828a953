pub mod catalog;
pub mod configuration;
pub mod data;
pub mod defs;
pub mod engine;
pub mod error;
pub mod listinfo;
pub mod newsletter;
pub mod output;
pub mod zipcode;

pub use crate::catalog::{Catalog, Dataset};
pub use crate::engine::{group_by_list, list_detail, run_query, summarize_all, Locality, LocalityQuery, QueryResult};
pub use crate::error::{Error, Result};
pub use crate::listinfo::{resolve_list_info, ListMatch};
pub use crate::zipcode::{canonical_zipcode, resolve_canonical_zipcode};
