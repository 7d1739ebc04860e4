//! CSV table writer.
//!
//! Writes derived tables back as delimited text for reuse by the
//! presentation layer without recomputation.

use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write serializable rows to a CSV file
///
/// **Public** - main entry point for table output
///
/// # Arguments
/// * `rows` - rows implementing Serialize (headers come from field names)
/// * `output_path` - path to output CSV file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::CsvFailed` - row serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_table<T: Serialize>(
    rows: &[T],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} rows to: {}", rows.len(), output_path.display());

    validate_output_path(output_path)?;
    ensure_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(OutputError::WriteFailed)?;

    Ok(())
}

/// Ensure the parent directory chain exists
fn ensure_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Validate that the output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        entity: String,
        score: f64,
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let rows = vec![
            Row { entity: "USA".to_string(), score: 12.0 },
            Row { entity: "CHN".to_string(), score: 9.5 },
        ];

        write_table(&rows, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let loaded: Vec<Row> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested/dirs/table.csv");
        write_table(&[Row { entity: "FRA".to_string(), score: 1.0 }], &nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let dir = tempdir().unwrap();
        assert!(validate_output_path(dir.path()).is_err());
    }
}
