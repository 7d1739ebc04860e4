//! Top-athletes command implementation.
//!
//! Ranks countries by medal points (gold 3 / silver 2 / bronze 1, squad
//! medals counted once), then ranks each top country's athletes by the same
//! scoring. Produces the two CSVs the nested-circle view consumes.

use crate::loader::{Dataset, EventRecord, Season};
use crate::output::{write_report, write_table, RunReport};
use crate::pipeline::{
    aggregate, filter_events, rank_top_n, EntityKey, FilterParams, Metric,
};
use crate::utils::config::{ANALYSIS_END_YEAR, DEFAULT_TOP_N};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use super::leaderboard::default_window;

/// Arguments for the top-athletes command
#[derive(Debug, Clone)]
pub struct TopAthletesArgs {
    /// Directory holding the input tables
    pub data_dir: PathBuf,

    /// Season name ("Summer" or "Winter")
    pub season: String,

    /// Number of countries to keep
    pub top_countries: usize,

    /// Number of athletes to keep per country
    pub top_athletes: usize,

    /// Inclusive lower year bound (defaults per season)
    pub year_from: Option<i32>,

    /// Output path for the country ranking CSV
    pub output_countries: PathBuf,

    /// Output path for the per-country athlete ranking CSV
    pub output_athletes: PathBuf,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,
}

impl Default for TopAthletesArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            season: "Summer".to_string(),
            top_countries: DEFAULT_TOP_N,
            top_athletes: DEFAULT_TOP_N,
            year_from: None,
            output_countries: PathBuf::from("top_countries.csv"),
            output_athletes: PathBuf::from("top_athletes.csv"),
            report: None,
        }
    }
}

/// One country ranking row
#[derive(Debug, Clone, Serialize)]
pub struct CountryScoreRow {
    pub rank: usize,
    pub country: String,
    pub score: u64,
}

/// One athlete ranking row
#[derive(Debug, Clone, Serialize)]
pub struct AthleteScoreRow {
    pub country: String,
    pub rank: usize,
    pub athlete: String,
    pub discipline: String,
    pub score: u64,
}

/// Validate top-athletes arguments
pub fn validate_args(args: &TopAthletesArgs) -> Result<()> {
    Season::from_str(&args.season)?;
    if args.top_countries == 0 || args.top_athletes == 0 {
        anyhow::bail!("top-countries and top-athletes must be greater than 0");
    }
    Ok(())
}

/// Execute the top-athletes command
///
/// **Public** - main entry point called from main.rs
pub fn execute_top_athletes(args: TopAthletesArgs) -> Result<()> {
    let season = Season::from_str(&args.season)?;
    let (default_from, _) = default_window(season);
    let year_from = args.year_from.unwrap_or(default_from);

    info!("Step 1/4: Loading events...");
    let dataset = Dataset::load(&args.data_dir).context("Failed to load events table")?;

    info!("Step 2/4: Filtering {} {}-{}...", season, year_from, ANALYSIS_END_YEAR);
    let params = FilterParams::new(season, year_from, ANALYSIS_END_YEAR)?;
    let filtered = filter_events(&dataset.events, &params);

    info!("Step 3/4: Ranking top {} countries by points...", args.top_countries);
    let country_points = aggregate(&filtered, EntityKey::Country, Metric::Points);
    let board = rank_top_n(&country_points, args.top_countries);

    let country_rows: Vec<CountryScoreRow> = board
        .top
        .iter()
        .enumerate()
        .map(|(idx, entry)| CountryScoreRow {
            rank: idx + 1,
            country: entry.entity.clone(),
            score: entry.total as u64,
        })
        .collect();

    let mut athlete_rows: Vec<AthleteScoreRow> = Vec::new();
    for country_row in &country_rows {
        let country_records: Vec<&EventRecord> = filtered
            .iter()
            .filter(|r| r.noc == country_row.country)
            .copied()
            .collect();

        let athlete_points = aggregate(&country_records, EntityKey::Athlete, Metric::Points);
        let athlete_board = rank_top_n(&athlete_points, args.top_athletes);

        for (idx, entry) in athlete_board.top.iter().enumerate() {
            athlete_rows.push(AthleteScoreRow {
                country: country_row.country.clone(),
                rank: idx + 1,
                athlete: entry.entity.clone(),
                discipline: main_discipline(&country_records, &entry.entity),
                score: entry.total as u64,
            });
        }
    }

    info!("Step 4/4: Writing output files...");
    write_table(&country_rows, &args.output_countries)
        .context("Failed to write country ranking CSV")?;
    info!("✓ Country ranking written to: {}", args.output_countries.display());

    write_table(&athlete_rows, &args.output_athletes)
        .context("Failed to write athlete ranking CSV")?;
    info!("✓ Athlete ranking written to: {}", args.output_athletes.display());

    if let Some(report_path) = &args.report {
        let report = RunReport::new("top-athletes", filtered.len())
            .with_output("countries", country_rows.len())
            .with_output("athletes", athlete_rows.len());
        write_report(&report, report_path).context("Failed to write run report")?;
    }

    Ok(())
}

/// The discipline an athlete appears in most often (medal rows first)
fn main_discipline(records: &[&EventRecord], athlete: &str) -> String {
    let mut counts: HashMap<&str, (u64, u64)> = HashMap::new();
    for record in records.iter().filter(|r| r.name == athlete) {
        let entry = counts.entry(record.sport.as_str()).or_insert((0, 0));
        if record.medal.is_some() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(sport, _)| sport.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Medal;

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&TopAthletesArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_zero_counts() {
        let args = TopAthletesArgs {
            top_countries: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_main_discipline_prefers_medal_rows() {
        let swimming_medal = EventRecord {
            name: "A".to_string(),
            noc: "USA".to_string(),
            sport: "Swimming".to_string(),
            event: None,
            season: Season::Summer,
            year: 2008,
            city: "Beijing".to_string(),
            medal: Some(Medal::Gold),
        };
        let athletics_no_medal = EventRecord {
            sport: "Athletics".to_string(),
            medal: None,
            ..swimming_medal.clone()
        };
        let records = vec![&swimming_medal, &athletics_no_medal];

        assert_eq!(main_discipline(&records, "A"), "Swimming");
    }
}
