//! Economy command implementation.
//!
//! Merges the average medal-table size per (era, country) against the
//! continent, population, GDP-per-capita, and climate dimensions, then
//! drops rows missing a mandatory dimension at the final selection step
//! and reports the drop rate.

use crate::loader::{Dataset, DimensionTables, EventRecord, Season};
use crate::output::{write_report, write_table, RunReport};
use crate::pipeline::{
    aggregate, era_label, finalize, merge_dimensions, round_display, EntityKey, EraAverageRow,
    MergedRow, Metric,
};
use crate::utils::config::ECONOMY_ERA_SPLIT_YEAR;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments for the economy command
#[derive(Debug, Clone)]
pub struct EconomyArgs {
    /// Directory holding the input tables
    pub data_dir: PathBuf,

    /// Keep Summer and Winter as separate rows instead of pooling them
    pub per_season: bool,

    /// Output path for the merged CSV
    pub output: PathBuf,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,
}

impl Default for EconomyArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            per_season: false,
            output: PathBuf::from("economy.csv"),
            report: None,
        }
    }
}

/// One exported economy row
#[derive(Debug, Clone, Serialize)]
pub struct EconomyExportRow {
    pub era: String,
    pub continent: String,
    pub country: String,
    pub season: Option<String>,
    pub population: f64,
    pub avg_medals: f64,
    pub gdp_per_capita: f64,
    pub climate: Option<String>,
}

/// Execute the economy command
///
/// **Public** - main entry point called from main.rs
pub fn execute_economy(args: EconomyArgs) -> Result<()> {
    info!("Step 1/5: Loading events and dimension tables...");
    let dataset = Dataset::load(&args.data_dir).context("Failed to load events table")?;
    let dims = DimensionTables::load(&args.data_dir).context("Failed to load dimension tables")?;

    let region_by_noc: HashMap<&str, &str> = dims
        .regions
        .iter()
        .map(|r| (r.noc.as_str(), r.region.as_str()))
        .collect();

    info!("Step 2/5: Aggregating medal-table size per (era, country)...");
    let era_rows = build_era_averages(&dataset.events, &region_by_noc, args.per_season);

    info!("Step 3/5: Merging dimension tables...");
    let merged = merge_dimensions(&era_rows, &dims, ECONOMY_ERA_SPLIT_YEAR);

    info!("Step 4/5: Final selection (mandatory dimensions)...");
    let (kept, merge_report) = finalize(merged);
    let rows = export_rows(&kept);

    info!("Step 5/5: Writing output files...");
    write_table(&rows, &args.output).context("Failed to write economy CSV")?;
    info!("✓ Economy table written to: {}", args.output.display());

    if let Some(report_path) = &args.report {
        let report = RunReport::new("economy", dataset.events.len())
            .with_output("economy", rows.len())
            .with_drop_fraction(merge_report.drop_fraction());
        write_report(&report, report_path).context("Failed to write run report")?;
    }

    Ok(())
}

/// Average per-edition delegation size into per-(era, region) rows
///
/// Each (country, year, season) edition contributes one count; the era mean
/// is taken over those editions. Countries missing from the region mapping
/// keep their NOC as the region key, miss every dimension join, and are
/// dropped at the final selection where they count toward the drop rate.
fn build_era_averages(
    events: &[EventRecord],
    region_by_noc: &HashMap<&str, &str>,
    per_season: bool,
) -> Vec<EraAverageRow> {
    let mut sums: HashMap<(String, String, Option<Season>), (f64, usize)> = HashMap::new();

    for season in [Season::Summer, Season::Winter] {
        let records: Vec<&EventRecord> = events.iter().filter(|e| e.season == season).collect();
        let counts = aggregate(&records, EntityKey::Country, Metric::RowCount);

        for row in &counts {
            let region = region_by_noc
                .get(row.entity.as_str())
                .map(|r| r.to_string())
                .unwrap_or_else(|| row.entity.clone());
            let era = era_label(row.year, ECONOMY_ERA_SPLIT_YEAR);
            let season_key = if per_season { Some(season) } else { None };

            let entry = sums.entry((era, region, season_key)).or_insert((0.0, 0));
            entry.0 += row.value;
            entry.1 += 1;
        }
    }

    let mut rows: Vec<EraAverageRow> = sums
        .into_iter()
        .map(|((era, region, season), (sum, count))| EraAverageRow {
            era,
            region,
            season,
            avg_medals: sum / count as f64,
        })
        .collect();
    rows.sort_by(|a, b| a.era.cmp(&b.era).then_with(|| a.region.cmp(&b.region)));
    rows
}

/// Convert merged rows to the export shape, sorted by (era, continent)
fn export_rows(kept: &[MergedRow]) -> Vec<EconomyExportRow> {
    let mut rows: Vec<EconomyExportRow> = kept
        .iter()
        .map(|row| EconomyExportRow {
            era: row.era.clone(),
            // finalize guarantees the mandatory dimensions are present
            continent: row.continent.clone().unwrap_or_default(),
            country: row.region.clone(),
            season: row.season.map(|s| s.to_string()),
            population: round_display(row.population.unwrap_or_default(), 2),
            avg_medals: round_display(row.avg_medals, 0),
            gdp_per_capita: round_display(row.gdp_per_capita.unwrap_or_default(), 2),
            climate: row.climate.map(|c| c.label().to_string()),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.era
            .cmp(&b.era)
            .then_with(|| a.continent.cmp(&b.continent))
            .then_with(|| a.country.cmp(&b.country))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Medal;

    fn record(noc: &str, year: i32, season: Season) -> EventRecord {
        EventRecord {
            name: "A".to_string(),
            noc: noc.to_string(),
            sport: "Athletics".to_string(),
            event: None,
            season,
            year,
            city: "City".to_string(),
            medal: Some(Medal::Gold),
        }
    }

    #[test]
    fn test_build_era_averages_pooled() {
        let events = vec![
            record("FRA", 2000, Season::Summer),
            record("FRA", 2000, Season::Summer),
            record("FRA", 2004, Season::Summer),
        ];
        let regions: HashMap<&str, &str> = [("FRA", "France")].into_iter().collect();

        let rows = build_era_averages(&events, &regions, false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "France");
        assert_eq!(rows[0].era, "1991-2020");
        // Mean of the 2000 edition (2 rows) and the 2004 edition (1 row)
        assert!((rows[0].avg_medals - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_build_era_averages_per_season() {
        let events = vec![
            record("NOR", 2000, Season::Summer),
            record("NOR", 2002, Season::Winter),
        ];
        let regions: HashMap<&str, &str> = [("NOR", "Norway")].into_iter().collect();

        let rows = build_era_averages(&events, &regions, true);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.season == Some(Season::Summer)));
        assert!(rows.iter().any(|r| r.season == Some(Season::Winter)));
    }

    #[test]
    fn test_unmapped_noc_keeps_code_as_region() {
        let events = vec![record("XYZ", 2000, Season::Summer)];
        let regions: HashMap<&str, &str> = HashMap::new();

        let rows = build_era_averages(&events, &regions, false);
        assert_eq!(rows[0].region, "XYZ");
    }
}
