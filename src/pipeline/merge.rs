//! Cross-table merger: join aggregated rows against dimension tables.
//!
//! Two-stage missing-value policy: during the merge a failed lookup yields a
//! missing marker and the row is kept; only at the final export step are rows
//! missing a mandatory dimension dropped, with the drop rate reported.

use crate::loader::dataset::DimensionTables;
use crate::loader::schema::{Climate, Season};
use crate::utils::config::{ANALYSIS_END_YEAR, ERA_START_YEAR};
use log::info;
use std::collections::HashMap;

/// Era label for a year given the split year closing the early era
///
/// **Public** - e.g. split 1990 buckets into "1945-1990" / "1991-2020"
pub fn era_label(year: i32, split: i32) -> String {
    if year >= ERA_START_YEAR && year <= split {
        format!("{}-{}", ERA_START_YEAR, split)
    } else {
        format!("{}-{}", split + 1, ANALYSIS_END_YEAR)
    }
}

/// Input to the merger: average medal-table size per (era, region)
#[derive(Debug, Clone)]
pub struct EraAverageRow {
    pub era: String,
    pub region: String,
    pub season: Option<Season>,
    pub avg_medals: f64,
}

/// Merger output: the aggregate plus every dimension, misses kept as None
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub era: String,
    pub region: String,
    pub season: Option<Season>,
    pub avg_medals: f64,
    pub continent: Option<String>,
    pub population: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub climate: Option<Climate>,
}

/// Data-quality summary of the final selection step
#[derive(Debug, Clone, Copy)]
pub struct MergeReport {
    pub input_rows: usize,
    pub kept_rows: usize,
}

impl MergeReport {
    /// Fraction of rows dropped for missing mandatory dimensions
    pub fn drop_fraction(&self) -> f64 {
        if self.input_rows == 0 {
            0.0
        } else {
            1.0 - (self.kept_rows as f64 / self.input_rows as f64)
        }
    }
}

/// Left-join aggregated rows against all dimension tables
///
/// **Public** - every input row survives; failed lookups become None.
/// Continent and climate join on region alone (time-invariant); population
/// and GDP join on (era, region) using per-era means.
pub fn merge_dimensions(
    rows: &[EraAverageRow],
    dims: &DimensionTables,
    era_split: i32,
) -> Vec<MergedRow> {
    let continent_by_region: HashMap<&str, &str> = dims
        .continents
        .iter()
        .map(|c| (c.region.as_str(), c.continent.as_str()))
        .collect();
    let climate_by_region: HashMap<&str, Climate> = dims
        .climate
        .iter()
        .map(|c| (c.region.as_str(), c.climate))
        .collect();

    let population_by_era = mean_by_era(
        dims.population.iter().map(|p| (p.region.as_str(), p.year, p.population)),
        era_split,
    );
    let gdp_by_era = mean_by_era(
        dims.gdp.iter().map(|g| (g.region.as_str(), g.year, g.gdp_per_capita)),
        era_split,
    );

    rows.iter()
        .map(|row| {
            let era_key = (row.era.clone(), row.region.clone());
            MergedRow {
                era: row.era.clone(),
                region: row.region.clone(),
                season: row.season,
                avg_medals: row.avg_medals,
                continent: continent_by_region
                    .get(row.region.as_str())
                    .map(|c| c.to_string()),
                population: population_by_era.get(&era_key).copied(),
                gdp_per_capita: gdp_by_era.get(&era_key).copied(),
                climate: climate_by_region.get(row.region.as_str()).copied(),
            }
        })
        .collect()
}

/// Mean value per (era, region) from long (region, year, value) rows
fn mean_by_era<'a>(
    rows: impl Iterator<Item = (&'a str, i32, f64)>,
    era_split: i32,
) -> HashMap<(String, String), f64> {
    let mut sums: HashMap<(String, String), (f64, usize)> = HashMap::new();
    for (region, year, value) in rows {
        let key = (era_label(year, era_split), region.to_string());
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Final selection: drop rows missing any mandatory dimension
///
/// **Public** - the only place rows are dropped; the drop rate is logged and
/// returned for the run report. Climate stays optional.
pub fn finalize(rows: Vec<MergedRow>) -> (Vec<MergedRow>, MergeReport) {
    let input_rows = rows.len();
    let kept: Vec<MergedRow> = rows
        .into_iter()
        .filter(|r| r.continent.is_some() && r.population.is_some() && r.gdp_per_capita.is_some())
        .collect();

    let report = MergeReport {
        input_rows,
        kept_rows: kept.len(),
    };
    info!(
        "Final selection kept {}/{} rows (drop rate {:.1}%)",
        report.kept_rows,
        report.input_rows,
        report.drop_fraction() * 100.0
    );

    (kept, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::schema::{ClimateRow, ContinentRow, GdpRow, PopulationRow};

    fn dims() -> DimensionTables {
        DimensionTables {
            regions: vec![],
            continents: vec![ContinentRow {
                region: "France".to_string(),
                continent: "Europe".to_string(),
            }],
            population: vec![
                PopulationRow { region: "France".to_string(), year: 1980, population: 54.0 },
                PopulationRow { region: "France".to_string(), year: 1990, population: 56.0 },
                PopulationRow { region: "France".to_string(), year: 2000, population: 60.0 },
            ],
            gdp: vec![GdpRow {
                iso: "FRA".to_string(),
                region: "France".to_string(),
                year: 2000,
                gdp_per_capita: 30000.0,
            }],
            climate: vec![ClimateRow {
                region: "France".to_string(),
                climate: Climate::Moderate,
            }],
        }
    }

    fn input(era: &str, region: &str) -> EraAverageRow {
        EraAverageRow {
            era: era.to_string(),
            region: region.to_string(),
            season: None,
            avg_medals: 10.0,
        }
    }

    #[test]
    fn test_era_label() {
        assert_eq!(era_label(1960, 1990), "1945-1990");
        assert_eq!(era_label(1990, 1990), "1945-1990");
        assert_eq!(era_label(1991, 1990), "1991-2020");
        assert_eq!(era_label(1992, 1991), "1992-2020");
    }

    #[test]
    fn test_merge_resolves_dimensions() {
        let rows = vec![input("1945-1990", "France")];
        let merged = merge_dimensions(&rows, &dims(), 1990);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].continent.as_deref(), Some("Europe"));
        // Mean of the 1980 and 1990 population values
        assert_eq!(merged[0].population, Some(55.0));
        // GDP only has a 2000 value, which belongs to the late era
        assert_eq!(merged[0].gdp_per_capita, None);
        assert_eq!(merged[0].climate, Some(Climate::Moderate));
    }

    #[test]
    fn test_merge_keeps_unmatched_rows() {
        let rows = vec![input("1991-2020", "Atlantis")];
        let merged = merge_dimensions(&rows, &dims(), 1990);

        assert_eq!(merged.len(), 1);
        assert!(merged[0].continent.is_none());
        assert!(merged[0].population.is_none());
    }

    #[test]
    fn test_finalize_drop_rate() {
        let mut rows = Vec::new();
        for i in 0..10 {
            let region = if i < 8 { "France" } else { "Atlantis" };
            rows.push(input("1991-2020", region));
        }
        let merged = merge_dimensions(&rows, &dims(), 1990);
        let (kept, report) = finalize(merged);

        assert_eq!(kept.len(), 8);
        assert_eq!(report.input_rows, 10);
        assert!((report.drop_fraction() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_empty() {
        let (kept, report) = finalize(Vec::new());
        assert!(kept.is_empty());
        assert_eq!(report.drop_fraction(), 0.0);
    }
}
