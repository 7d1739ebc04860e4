//! Host-advantage command implementation.
//!
//! For each country and era, compares editions the country hosted against
//! editions it attended abroad: average athletes fielded, average medals
//! won, and the medals-per-athlete ratio, pivoted into Host/Away column
//! pairs.

use crate::loader::{Dataset, EventRecord, HostMap, Season};
use crate::output::{write_report, write_table, RunReport};
use crate::pipeline::{
    aggregate, era_label, filter_events, pivot_wide, ratio, round_display, AggregateRow,
    EntityKey, FilterParams, LongRow, Metric, WideRow,
};
use crate::utils::config::{ANALYSIS_END_YEAR, ERA_START_YEAR, HOST_ERA_SPLIT_YEAR};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

const CONDITIONS: &[&str] = &["Host", "Away"];
const METRICS: &[&str] = &["athletes", "medals", "ratio"];

/// Arguments for the host-advantage command
#[derive(Debug, Clone)]
pub struct HostAdvantageArgs {
    /// Directory holding the input tables
    pub data_dir: PathBuf,

    /// Optional season restriction (default: both seasons)
    pub season: Option<String>,

    /// Inclusive year window
    pub year_from: i32,
    pub year_to: i32,

    /// Output path for the comparative CSV
    pub output: PathBuf,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,
}

impl Default for HostAdvantageArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            season: None,
            year_from: ERA_START_YEAR,
            year_to: ANALYSIS_END_YEAR,
            output: PathBuf::from("host_advantage.csv"),
            report: None,
        }
    }
}

/// One exported host-advantage row: paired Host/Away columns per (country, era)
#[derive(Debug, Clone, Serialize)]
pub struct HostAdvantageRow {
    pub country: String,
    pub period: String,
    pub athletes_host: Option<f64>,
    pub athletes_away: Option<f64>,
    pub medals_host: Option<f64>,
    pub medals_away: Option<f64>,
    pub ratio_host: Option<f64>,
    pub ratio_away: Option<f64>,
}

/// Validate host-advantage arguments
pub fn validate_args(args: &HostAdvantageArgs) -> Result<()> {
    if let Some(season) = &args.season {
        Season::from_str(season)?;
    }
    if args.year_from > args.year_to {
        anyhow::bail!("Year range start {} is after end {}", args.year_from, args.year_to);
    }
    Ok(())
}

/// Execute the host-advantage command
///
/// **Public** - main entry point called from main.rs
pub fn execute_host_advantage(args: HostAdvantageArgs) -> Result<()> {
    info!("Step 1/5: Loading events...");
    let dataset = Dataset::load(&args.data_dir).context("Failed to load events table")?;
    let hosts = HostMap::from_events(&dataset.events);

    info!("Step 2/5: Filtering {}-{}...", args.year_from, args.year_to);
    let seasons: Vec<Season> = match &args.season {
        Some(s) => vec![Season::from_str(s)?],
        None => vec![Season::Summer, Season::Winter],
    };
    let mut filtered: Vec<&EventRecord> = Vec::new();
    for season in &seasons {
        let params = FilterParams::new(*season, args.year_from, args.year_to)?;
        filtered.extend(filter_events(&dataset.events, &params));
    }

    info!("Step 3/5: Aggregating per (country, edition, condition)...");
    let (host_rows, away_rows): (Vec<&EventRecord>, Vec<&EventRecord>) = filtered
        .iter()
        .copied()
        .partition(|r| hosts.is_host(&r.noc, r.year, r.season));

    let long = build_long_rows(&host_rows, &away_rows);

    info!("Step 4/5: Pivoting to Host/Away column pairs...");
    let wide = pivot_wide(&long, CONDITIONS, METRICS)?;
    let rows = export_rows(&wide);

    info!("Step 5/5: Writing output files...");
    write_table(&rows, &args.output).context("Failed to write host-advantage CSV")?;
    info!("✓ Host advantage written to: {}", args.output.display());

    if let Some(report_path) = &args.report {
        let report = RunReport::new("host-advantage", filtered.len())
            .with_output("host_advantage", rows.len());
        write_report(&report, report_path).context("Failed to write run report")?;
    }

    Ok(())
}

/// Average a per-(entity, year) aggregate into per-(entity, era) means
///
/// The mean is taken over editions present in the aggregate, matching the
/// per-edition averages the comparison is defined on.
fn mean_by_era(rows: &[AggregateRow]) -> HashMap<(String, String), f64> {
    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
    for row in rows {
        let key = (row.entity.clone(), era_label(row.year, HOST_ERA_SPLIT_YEAR));
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += row.value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Build the long comparative table, one row per (country, era, condition)
fn build_long_rows(host_rows: &[&EventRecord], away_rows: &[&EventRecord]) -> Vec<LongRow> {
    let mut long = Vec::new();
    for (condition, records) in [("Host", host_rows), ("Away", away_rows)] {
        let athletes = mean_by_era(&aggregate(records, EntityKey::Country, Metric::DistinctAthletes));
        let medals = mean_by_era(&aggregate(records, EntityKey::Country, Metric::MedalCount));

        // Entities come from the athlete counts: every attended edition
        // fields athletes, while medal-less editions have no medal rows
        let mut keys: Vec<&(String, String)> = athletes.keys().collect();
        keys.sort();
        for key in keys {
            let (country, era) = key;
            let avg_athletes = athletes[key];
            let avg_medals = medals.get(key).copied().unwrap_or(0.0);
            long.push(
                LongRow::new(country, era, condition)
                    .with_metric("athletes", Some(avg_athletes))
                    .with_metric("medals", Some(avg_medals))
                    .with_metric("ratio", ratio(avg_medals, avg_athletes)),
            );
        }
    }
    long
}

/// Convert wide rows to the export shape, rounding for display only
fn export_rows(wide: &[WideRow]) -> Vec<HostAdvantageRow> {
    wide.iter()
        .map(|row| HostAdvantageRow {
            country: row.entity.clone(),
            period: row.period.clone(),
            athletes_host: row.value("athletes", "Host").map(|v| round_display(v, 0)),
            athletes_away: row.value("athletes", "Away").map(|v| round_display(v, 0)),
            medals_host: row.value("medals", "Host").map(|v| round_display(v, 0)),
            medals_away: row.value("medals", "Away").map(|v| round_display(v, 0)),
            ratio_host: row.value("ratio", "Host").map(|v| round_display(v, 2)),
            ratio_away: row.value("ratio", "Away").map(|v| round_display(v, 2)),
        })
        .collect()
}
