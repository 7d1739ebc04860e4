//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading input tables
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read input file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Input table is empty: {0}")]
    EmptyTable(String),
}

/// Errors that can occur while running a pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown season '{0}' (expected 'Summer' or 'Winter')")]
    UnknownSeason(String),

    #[error("Unknown country code '{0}' (not present in the loaded events)")]
    UnknownCountry(String),

    #[error("Invalid year range: {from} > {to}")]
    InvalidYearRange { from: i32, to: i32 },

    #[error("Duplicate rows for entity '{entity}', period '{period}', condition '{condition}'")]
    DuplicateCondition {
        entity: String,
        period: String,
        condition: String,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize CSV row: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
