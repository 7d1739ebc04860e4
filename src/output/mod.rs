//! Output writers for derived tables and run reports.
//!
//! This module handles writing data to disk:
//! - CSV tables consumed by the presentation layer
//! - JSON run reports with data-quality metadata

pub mod csv;
pub mod report;

// Re-export main functions
pub use csv::write_table;
pub use report::{read_report, write_report, RunReport};
