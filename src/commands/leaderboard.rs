//! Leaderboard command implementation.
//!
//! The leaderboard command:
//! 1. Loads the events table
//! 2. Filters by season and year window
//! 3. Counts medals per country per year for each discipline
//! 4. Ranks countries and folds the remainder into Others
//! 5. Writes the leaderboard CSV, the host-by-year CSV, and the run report

use crate::loader::{Dataset, HostMap, Season};
use crate::output::{write_report, write_table, RunReport};
use crate::pipeline::{
    aggregate, filter_events, filter_sport, rank_top_n, EntityKey, FilterParams, Metric,
    OTHERS_LABEL,
};
use crate::utils::config::{
    ANALYSIS_END_YEAR, DEFAULT_TOP_N, SUMMER_SPORTS, SUMMER_START_YEAR, WINTER_SPORTS,
    WINTER_START_YEAR,
};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Arguments for the leaderboard command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct LeaderboardArgs {
    /// Directory holding the input tables
    pub data_dir: PathBuf,

    /// Season name ("Summer" or "Winter")
    pub season: String,

    /// Single discipline to rank (default: the season's discipline list)
    pub discipline: Option<String>,

    /// Inclusive year window (defaults per season)
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,

    /// Number of countries to keep per discipline
    pub top_n: usize,

    /// Output path for the leaderboard CSV
    pub output: PathBuf,

    /// Output path for the host-by-year CSV
    pub hosts_output: Option<PathBuf>,

    /// Output path for the JSON run report (optional)
    pub report: Option<PathBuf>,
}

impl Default for LeaderboardArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            season: "Summer".to_string(),
            discipline: None,
            year_from: None,
            year_to: None,
            top_n: DEFAULT_TOP_N,
            output: PathBuf::from("leaderboard.csv"),
            hosts_output: None,
            report: None,
        }
    }
}

/// One exported leaderboard row (long format: one row per entity per year)
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardExportRow {
    pub sport: String,
    /// 1-based rank; empty for the Others fold
    pub rank: Option<usize>,
    pub country: String,
    pub year: i32,
    pub medals: u64,
    pub total: u64,
}

/// One host-by-year row
#[derive(Debug, Clone, Serialize)]
pub struct HostExportRow {
    pub year: i32,
    pub host_country: String,
}

/// Validate leaderboard arguments
///
/// **Public** - can be called before execute for early validation
pub fn validate_args(args: &LeaderboardArgs) -> Result<()> {
    Season::from_str(&args.season)?;

    if args.top_n == 0 {
        anyhow::bail!("top must be greater than 0");
    }
    if args.top_n > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }
    if let (Some(from), Some(to)) = (args.year_from, args.year_to) {
        if from > to {
            anyhow::bail!("Year range start {} is after end {}", from, to);
        }
    }

    Ok(())
}

/// Default year window for a season's leaderboards
pub fn default_window(season: Season) -> (i32, i32) {
    match season {
        Season::Summer => (SUMMER_START_YEAR, ANALYSIS_END_YEAR),
        Season::Winter => (WINTER_START_YEAR, ANALYSIS_END_YEAR),
    }
}

/// Execute the leaderboard command
///
/// **Public** - main entry point called from main.rs
pub fn execute_leaderboard(args: LeaderboardArgs) -> Result<()> {
    let season = Season::from_str(&args.season)?;
    let (default_from, default_to) = default_window(season);
    let year_from = args.year_from.unwrap_or(default_from);
    let year_to = args.year_to.unwrap_or(default_to);

    info!("Step 1/4: Loading events...");
    let dataset = Dataset::load(&args.data_dir).context("Failed to load events table")?;

    info!("Step 2/4: Filtering {} {}-{}...", season, year_from, year_to);
    let params = FilterParams::new(season, year_from, year_to)?;
    let filtered = filter_events(&dataset.events, &params);

    let sports: Vec<String> = match &args.discipline {
        Some(sport) => vec![sport.clone()],
        None => match season {
            Season::Summer => SUMMER_SPORTS.iter().map(|s| s.to_string()).collect(),
            Season::Winter => WINTER_SPORTS.iter().map(|s| s.to_string()).collect(),
        },
    };

    info!("Step 3/4: Ranking top {} countries for {} disciplines...", args.top_n, sports.len());
    let mut rows: Vec<LeaderboardExportRow> = Vec::new();
    for sport in &sports {
        let sport_records = filter_sport(&filtered, sport);
        if sport_records.is_empty() {
            warn!("No rows for discipline '{}' in this window", sport);
            continue;
        }

        let agg = aggregate(&sport_records, EntityKey::Country, Metric::MedalCount);
        let board = rank_top_n(&agg, args.top_n);

        for (idx, entry) in board.top.iter().enumerate() {
            for (year, value) in &entry.by_year {
                rows.push(LeaderboardExportRow {
                    sport: sport.clone(),
                    rank: Some(idx + 1),
                    country: entry.entity.clone(),
                    year: *year,
                    medals: *value as u64,
                    total: entry.total as u64,
                });
            }
        }
        if let Some(others) = &board.others {
            for (year, value) in &others.by_year {
                rows.push(LeaderboardExportRow {
                    sport: sport.clone(),
                    rank: None,
                    country: OTHERS_LABEL.to_string(),
                    year: *year,
                    medals: *value as u64,
                    total: others.total as u64,
                });
            }
        }
    }

    info!("Step 4/4: Writing output files...");
    write_table(&rows, &args.output).context("Failed to write leaderboard CSV")?;
    info!("✓ Leaderboard written to: {}", args.output.display());

    let hosts = HostMap::from_events(&dataset.events);
    let host_rows: Vec<HostExportRow> = hosts
        .hosts_by_year(season)
        .into_iter()
        .filter(|(year, _)| *year >= year_from && *year <= year_to)
        .map(|(year, host_country)| HostExportRow { year, host_country })
        .collect();

    if let Some(hosts_path) = &args.hosts_output {
        write_table(&host_rows, hosts_path).context("Failed to write hosts CSV")?;
        info!("✓ Host map written to: {}", hosts_path.display());
    }

    if let Some(report_path) = &args.report {
        let report = RunReport::new("leaderboard", filtered.len())
            .with_output("leaderboard", rows.len())
            .with_output("hosts", host_rows.len());
        write_report(&report, report_path).context("Failed to write run report")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = LeaderboardArgs::default();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_unknown_season() {
        let args = LeaderboardArgs {
            season: "Spring".to_string(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_top() {
        let args = LeaderboardArgs {
            top_n: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_inverted_years() {
        let args = LeaderboardArgs {
            year_from: Some(2020),
            year_to: Some(1992),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_default_window_per_season() {
        assert_eq!(default_window(Season::Summer), (1992, 2020));
        assert_eq!(default_window(Season::Winter), (1994, 2020));
    }
}
