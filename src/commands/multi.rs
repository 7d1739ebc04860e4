//! Multi-medalist dependency command implementation.
//!
//! Computes each country's points per edition twice: once over all athletes
//! and once excluding athletes who won 2+ medals in that edition, then pairs
//! the two series into With/Without columns. The gap shows how much a
//! country's score depends on its multi-medalists.

use crate::loader::{Dataset, EventRecord, Season};
use crate::output::{write_report, write_table, RunReport};
use crate::pipeline::{
    aggregate, filter_events, multi_medalists, pivot_wide, AggregateRow, EntityKey, FilterParams,
    LongRow, Metric, WideRow,
};
use crate::utils::config::ANALYSIS_END_YEAR;
use crate::utils::error::PipelineError;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::str::FromStr;

use super::leaderboard::default_window;

const CONDITIONS: &[&str] = &["With", "Without"];
const METRICS: &[&str] = &["points", "medals"];

/// Arguments for the multi-medalist command
#[derive(Debug, Clone)]
pub struct MultiMedalistArgs {
    /// Directory holding the input tables
    pub data_dir: PathBuf,

    /// Season name ("Summer" or "Winter")
    pub season: String,

    /// Restrict the export to one country code (optional)
    pub country: Option<String>,

    /// Inclusive lower year bound (defaults per season)
    pub year_from: Option<i32>,

    /// Output path for the comparative CSV
    pub output: PathBuf,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,
}

impl Default for MultiMedalistArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            season: "Summer".to_string(),
            country: None,
            year_from: None,
            output: PathBuf::from("multi_medalist.csv"),
            report: None,
        }
    }
}

/// One exported comparative row per (country, edition)
#[derive(Debug, Clone, Serialize)]
pub struct MultiMedalistRow {
    pub country: String,
    pub year: i32,
    pub points_with: Option<f64>,
    pub points_without: Option<f64>,
    pub medals_with: Option<f64>,
    pub medals_without: Option<f64>,
}

/// Validate multi-medalist arguments
pub fn validate_args(args: &MultiMedalistArgs) -> Result<()> {
    Season::from_str(&args.season)?;
    if let Some(country) = &args.country {
        if country.trim().is_empty() {
            anyhow::bail!("country must not be empty when given");
        }
    }
    Ok(())
}

/// Execute the multi-medalist command
///
/// **Public** - main entry point called from main.rs
pub fn execute_multi_medalist(args: MultiMedalistArgs) -> Result<()> {
    let season = Season::from_str(&args.season)?;
    let (default_from, _) = default_window(season);
    let year_from = args.year_from.unwrap_or(default_from);

    info!("Step 1/5: Loading events...");
    let dataset = Dataset::load(&args.data_dir).context("Failed to load events table")?;

    // A bad country code is a request error, not a silent empty export
    if let Some(country) = &args.country {
        if !dataset.knows_country(country) {
            return Err(PipelineError::UnknownCountry(country.clone()).into());
        }
    }

    info!("Step 2/5: Filtering {} {}-{}...", season, year_from, ANALYSIS_END_YEAR);
    let params = FilterParams::new(season, year_from, ANALYSIS_END_YEAR)?;
    let filtered = filter_events(&dataset.events, &params);

    info!("Step 3/5: Aggregating points with and without multi-medalists...");
    let multi = multi_medalists(&filtered);
    let without: Vec<&EventRecord> = filtered
        .iter()
        .filter(|r| !multi.contains(&(r.name.clone(), r.year)))
        .copied()
        .collect();

    let long = build_long_rows(&filtered, &without);

    info!("Step 4/5: Pivoting to With/Without column pairs...");
    let wide = pivot_wide(&long, CONDITIONS, METRICS)?;
    let mut rows = export_rows(&wide)?;
    if let Some(country) = &args.country {
        rows.retain(|r| &r.country == country);
    }

    info!("Step 5/5: Writing output files...");
    write_table(&rows, &args.output).context("Failed to write multi-medalist CSV")?;
    info!("✓ Multi-medalist table written to: {}", args.output.display());

    if let Some(report_path) = &args.report {
        let report = RunReport::new("multi-medalist", filtered.len())
            .with_output("multi_medalist", rows.len());
        write_report(&report, report_path).context("Failed to write run report")?;
    }

    Ok(())
}

/// Index aggregate rows by (entity, year)
fn index(rows: &[AggregateRow]) -> HashMap<(String, i32), f64> {
    rows.iter()
        .map(|r| ((r.entity.clone(), r.year), r.value))
        .collect()
}

/// Build the long comparative table, one row per (country, edition, condition)
///
/// The With and Without series cover different (country, year) sets: a
/// country whose entire score came from multi-medalists has no Without row.
/// The reshaper turns those gaps into missing values.
fn build_long_rows(all: &[&EventRecord], without: &[&EventRecord]) -> Vec<LongRow> {
    let mut long = Vec::new();
    for (condition, records) in [("With", all), ("Without", without)] {
        let points = index(&aggregate(records, EntityKey::Country, Metric::Points));
        let medals = index(&aggregate(records, EntityKey::Country, Metric::MedalCount));

        let keys: BTreeSet<&(String, i32)> = points.keys().chain(medals.keys()).collect();
        for key in keys {
            let (country, year) = key;
            long.push(
                LongRow::new(country, &year.to_string(), condition)
                    .with_metric("points", points.get(key).copied().or(Some(0.0)))
                    .with_metric("medals", medals.get(key).copied().or(Some(0.0))),
            );
        }
    }
    long
}

/// Convert wide rows to the export shape
fn export_rows(wide: &[WideRow]) -> Result<Vec<MultiMedalistRow>> {
    let mut rows: Vec<MultiMedalistRow> = wide
        .iter()
        .map(|row| {
            let year = row
                .period
                .parse::<i32>()
                .with_context(|| format!("Invalid period '{}'", row.period))?;
            Ok(MultiMedalistRow {
                country: row.entity.clone(),
                year,
                points_with: row.value("points", "With"),
                points_without: row.value("points", "Without"),
                medals_with: row.value("medals", "With"),
                medals_without: row.value("medals", "Without"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Medal;

    fn record(name: &str, noc: &str, year: i32, event: &str, medal: Option<Medal>) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            noc: noc.to_string(),
            sport: "Swimming".to_string(),
            event: Some(event.to_string()),
            season: Season::Summer,
            year,
            city: "City".to_string(),
            medal,
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&MultiMedalistArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_blank_country() {
        let args = MultiMedalistArgs {
            country: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_without_series_drops_multi_medalist_points() {
        // A wins two golds in 2008 (multi-medalist), B wins one bronze
        let events = vec![
            record("A", "USA", 2008, "100m Fly", Some(Medal::Gold)),
            record("A", "USA", 2008, "200m Fly", Some(Medal::Gold)),
            record("B", "USA", 2008, "100m Free", Some(Medal::Bronze)),
        ];
        let all: Vec<&EventRecord> = events.iter().collect();
        let multi = multi_medalists(&all);
        let without: Vec<&EventRecord> = all
            .iter()
            .filter(|r| !multi.contains(&(r.name.clone(), r.year)))
            .copied()
            .collect();

        let long = build_long_rows(&all, &without);
        let wide = pivot_wide(&long, CONDITIONS, METRICS).unwrap();
        let rows = export_rows(&wide).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].points_with, Some(7.0)); // 3 + 3 + 1
        assert_eq!(rows[0].points_without, Some(1.0)); // bronze only
        assert_eq!(rows[0].medals_with, Some(3.0));
        assert_eq!(rows[0].medals_without, Some(1.0));
    }
}
