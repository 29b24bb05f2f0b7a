//! Retrieval of sheet snapshots for the viewstat pipeline.
//!
//! Downloads CSV exports with retry, parses them into
//! [`viewstat_core::RawTable`], and offers a caller-owned TTL cache.

pub mod cache;
pub mod client;
pub mod csv_table;
pub mod error;
pub mod source;

mod retry;

pub use cache::CachedSource;
pub use client::{export_url, SheetClient};
pub use csv_table::parse_csv;
pub use error::FetchError;
pub use source::{FileSource, HttpSource, TableSource};
