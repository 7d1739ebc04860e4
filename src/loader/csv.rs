//! Delimited-text reading with schema normalization.
//!
//! The source files come from several providers with messy headers (UTF-8 BOM
//! artifacts, localized names, inconsistent casing). All of that handling
//! lives here: headers are normalized once at load time and columns are then
//! looked up through canonical alias lists.

use crate::utils::error::LoadError;
use csv::StringRecord;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A raw loaded table: normalized headers plus unparsed string rows
///
/// **Public** - intermediate form between the CSV reader and the typed rows
#[derive(Debug, Clone)]
pub struct Table {
    /// Source file name (for error messages)
    pub file: String,

    /// Normalized column headers (BOM-stripped, trimmed, lowercased)
    pub headers: Vec<String>,

    /// Data rows as read
    pub rows: Vec<StringRecord>,
}

impl Table {
    /// Read a delimited file into a raw table
    ///
    /// **Public** - entry point for all input files
    ///
    /// # Errors
    /// * `LoadError::IoError` - file cannot be opened
    /// * `LoadError::CsvError` - malformed CSV structure
    /// * `LoadError::EmptyTable` - file has no header row
    pub fn read(path: impl AsRef<Path>) -> Result<Table, LoadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Reading table: {}", path.display());

        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();

        if headers.is_empty() {
            return Err(LoadError::EmptyTable(file_name));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }

        debug!("Loaded {} rows from {}", rows.len(), file_name);

        Ok(Table {
            file: file_name,
            headers,
            rows,
        })
    }

    /// Find a column by its canonical alias list
    ///
    /// **Public** - returns the first header matching any alias
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| aliases.iter().any(|a| h == a))
    }

    /// Find a column or fail with the first alias in the error message
    pub fn require_column(&self, aliases: &[&str]) -> Result<usize, LoadError> {
        self.column(aliases).ok_or_else(|| LoadError::MissingColumn {
            column: aliases.first().copied().unwrap_or("?").to_string(),
            file: self.file.clone(),
        })
    }

    /// Get a cell by row and column index; missing cells read as empty
    pub fn cell<'a>(&'a self, row: &'a StringRecord, idx: usize) -> &'a str {
        row.get(idx).unwrap_or("").trim()
    }

    /// Columns whose header parses as a calendar year (wide-format files)
    ///
    /// **Public** - used to melt population/GDP tables to long form
    pub fn year_columns(&self) -> Vec<(usize, i32)> {
        self.headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| h.parse::<i32>().ok().map(|year| (idx, year)))
            .collect()
    }
}

/// Normalize a raw header cell
///
/// **Public** - strips UTF-8 BOM artifacts, trims, lowercases
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim_start_matches("\u{ef}\u{bb}\u{bf}") // BOM bytes decoded as Latin-1
        .trim()
        .to_lowercase()
}

/// Parse a numeric cell leniently
///
/// **Public** - strips thousands separators; unparseable cells become None,
/// never an error (malformed rows must not abort the load)
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', "");
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("n/a") || cleaned == "--" {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parse a year cell leniently (tolerates float-formatted years like "1992.0")
pub fn parse_year(cell: &str) -> Option<i32> {
    let trimmed = cell.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    trimmed.parse::<f64>().ok().map(|f| f as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_table_basic() {
        let file = write_csv("Name,NOC,Year\nPhelps,USA,2008\nLatynina,URS,1956\n");
        let table = Table::read(file.path()).unwrap();

        assert_eq!(table.headers, vec!["name", "noc", "year"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_header_normalization_bom() {
        assert_eq!(normalize_header("\u{feff}ISO"), "iso");
        assert_eq!(normalize_header("\u{ef}\u{bb}\u{bf}Country Name"), "country name");
        assert_eq!(normalize_header("  Year  "), "year");
    }

    #[test]
    fn test_column_lookup_aliases() {
        let file = write_csv("Country Code,Total\nUSA,10\n");
        let table = Table::read(file.path()).unwrap();

        assert_eq!(table.column(&["noc", "country", "country code"]), Some(0));
        assert!(table.column(&["season"]).is_none());
        assert!(table.require_column(&["season"]).is_err());
    }

    #[test]
    fn test_parse_number_lenient() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("  42 "), Some(42.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_parse_year_float_format() {
        assert_eq!(parse_year("1992"), Some(1992));
        assert_eq!(parse_year("1992.0"), Some(1992));
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn test_year_columns() {
        let file = write_csv("Country Name,1990,1991,Notes\nFrance,56.7,57.0,x\n");
        let table = Table::read(file.path()).unwrap();

        assert_eq!(table.year_columns(), vec![(1, 1990), (2, 1991)]);
    }
}
