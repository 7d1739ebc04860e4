//! Input loading and schema normalization.
//!
//! This module handles:
//! - Reading delimited source files with messy real-world headers
//! - Producing typed, immutable row vectors
//! - Resolving host cities to organizing countries

pub mod csv;
pub mod dataset;
pub mod hosts;
pub mod schema;

// Re-export main types
pub use csv::{normalize_header, parse_number, parse_year, Table};
pub use dataset::{Dataset, DimensionTables};
pub use hosts::{host_country_for_city, HostMap};
pub use schema::{
    Climate, ClimateRow, ContinentRow, EventRecord, GdpRow, Medal, PopulationRow, RegionRow,
    Season,
};
