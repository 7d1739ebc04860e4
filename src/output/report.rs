//! JSON run report writer.
//!
//! Each command can write a small JSON report next to its CSV exports:
//! tool version, generated-at timestamp, row counts, and the merge drop
//! rate where one applies. The report gives data-quality visibility to
//! whoever consumes the derived tables.

use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Run report written alongside derived tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version for compatibility checking
    pub version: String,

    /// Command that produced the export
    pub command: String,

    /// Number of event rows after filtering
    pub input_rows: usize,

    /// Rows written per output table
    pub output_rows: BTreeMap<String, usize>,

    /// Fraction of rows dropped at the final merge selection, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_fraction: Option<f64>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl RunReport {
    /// Start a report for one command run
    pub fn new(command: &str, input_rows: usize) -> RunReport {
        RunReport {
            version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            input_rows,
            output_rows: BTreeMap::new(),
            drop_fraction: None,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Record the row count of one output table
    pub fn with_output(mut self, name: &str, rows: usize) -> RunReport {
        self.output_rows.insert(name.to_string(), rows);
        self
    }

    /// Record the final-selection drop fraction
    pub fn with_drop_fraction(mut self, fraction: f64) -> RunReport {
        self.drop_fraction = Some(fraction);
        self
    }
}

/// Write a run report to a JSON file
///
/// **Public** - pretty-printed for human inspection
pub fn write_report(report: &RunReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing run report to: {}", output_path.display());

    if let Some(parent) = output_path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(OutputError::WriteFailed)?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    Ok(())
}

/// Read a run report back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RunReport, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading run report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: RunReport = serde_json::from_reader(file)?;
    Ok(report)
}
