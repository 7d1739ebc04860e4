//! Ranker: top-N entities by total score, remainder folded into "Others".
//!
//! Tie-break is explicit: equal totals order by ascending entity key, so the
//! output is stable across runs and independent of input row order.

use super::aggregate::AggregateRow;
use log::debug;
use std::collections::BTreeMap;

/// Label of the synthetic row summing every excluded entity
pub const OTHERS_LABEL: &str = "Others";

/// One ranked entity with its per-year values
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Country code or athlete name ("Others" for the fold-in row)
    pub entity: String,

    /// Value per year; keys match the top rows' years so the per-period
    /// shape is consistent across the whole leaderboard
    pub by_year: BTreeMap<i32, f64>,

    /// Total across the window
    pub total: f64,
}

/// A truncated leaderboard: top N entities plus the Others fold
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub top: Vec<LeaderboardEntry>,
    pub others: Option<LeaderboardEntry>,
}

impl Leaderboard {
    /// Sum of every entity's total, Others included.
    ///
    /// Equals the unfiltered aggregate total: truncation never drops score.
    pub fn total(&self) -> f64 {
        let top: f64 = self.top.iter().map(|e| e.total).sum();
        top + self.others.as_ref().map_or(0.0, |o| o.total)
    }
}

/// Rank aggregated rows and truncate to the top N entities
///
/// **Public** - main entry point for ranking
///
/// # Arguments
/// * `rows` - aggregated (entity, year, value) rows for a fixed window
/// * `n` - number of entities to keep
///
/// # Returns
/// Top N entities ordered by descending total (ties by ascending entity key),
/// plus an Others entry whose per-year values sum all excluded entities.
pub fn rank_top_n(rows: &[AggregateRow], n: usize) -> Leaderboard {
    let mut per_entity: BTreeMap<String, BTreeMap<i32, f64>> = BTreeMap::new();
    for row in rows {
        *per_entity
            .entry(row.entity.clone())
            .or_default()
            .entry(row.year)
            .or_insert(0.0) += row.value;
    }

    let mut entries: Vec<LeaderboardEntry> = per_entity
        .into_iter()
        .map(|(entity, by_year)| {
            let total = by_year.values().sum();
            LeaderboardEntry {
                entity,
                by_year,
                total,
            }
        })
        .collect();

    // Descending total; equal totals resolve by ascending entity key
    entries.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.entity.cmp(&b.entity))
    });

    let excluded = entries.split_off(n.min(entries.len()));
    let others = if excluded.is_empty() {
        None
    } else {
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for entry in &excluded {
            for (year, value) in &entry.by_year {
                *by_year.entry(*year).or_insert(0.0) += value;
            }
        }
        let total = by_year.values().sum();
        Some(LeaderboardEntry {
            entity: OTHERS_LABEL.to_string(),
            by_year,
            total,
        })
    };

    debug!(
        "Ranked {} entities: kept {}, folded {} into Others",
        entries.len() + excluded.len(),
        entries.len(),
        excluded.len()
    );

    Leaderboard {
        top: entries,
        others,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entity: &str, year: i32, value: f64) -> AggregateRow {
        AggregateRow {
            entity: entity.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn test_top_n_ordering() {
        let rows = vec![
            row("USA", 2008, 10.0),
            row("CHN", 2008, 20.0),
            row("FRA", 2008, 5.0),
        ];
        let board = rank_top_n(&rows, 2);

        assert_eq!(board.top.len(), 2);
        assert_eq!(board.top[0].entity, "CHN");
        assert_eq!(board.top[1].entity, "USA");
        assert_eq!(board.others.as_ref().unwrap().total, 5.0);
    }

    #[test]
    fn test_tie_break_ascending_key() {
        let rows = vec![
            row("GER", 2008, 7.0),
            row("AUS", 2008, 7.0),
            row("FRA", 2008, 7.0),
        ];
        let board = rank_top_n(&rows, 3);

        let order: Vec<&str> = board.top.iter().map(|e| e.entity.as_str()).collect();
        assert_eq!(order, vec!["AUS", "FRA", "GER"]);
    }

    #[test]
    fn test_tie_break_stable_under_shuffle() {
        let rows = vec![row("B", 2008, 3.0), row("A", 2008, 3.0), row("C", 2008, 1.0)];
        let shuffled = vec![row("C", 2008, 1.0), row("A", 2008, 3.0), row("B", 2008, 3.0)];

        assert_eq!(rank_top_n(&rows, 2), rank_top_n(&shuffled, 2));
    }

    #[test]
    fn test_others_summed_per_year() {
        let rows = vec![
            row("USA", 2008, 10.0),
            row("USA", 2012, 12.0),
            row("FRA", 2008, 1.0),
            row("FRA", 2012, 2.0),
            row("GER", 2008, 3.0),
        ];
        let board = rank_top_n(&rows, 1);

        let others = board.others.unwrap();
        assert_eq!(others.by_year.get(&2008), Some(&4.0));
        assert_eq!(others.by_year.get(&2012), Some(&2.0));
        assert_eq!(others.total, 6.0);
    }

    #[test]
    fn test_conservation_of_total() {
        let rows = vec![
            row("USA", 2008, 10.0),
            row("CHN", 2008, 20.0),
            row("FRA", 2008, 5.0),
            row("GER", 2012, 2.5),
        ];
        let board = rank_top_n(&rows, 2);

        let input_total: f64 = rows.iter().map(|r| r.value).sum();
        assert!((board.total() - input_total).abs() < 1e-9);
    }

    #[test]
    fn test_no_others_when_all_fit() {
        let rows = vec![row("USA", 2008, 10.0)];
        let board = rank_top_n(&rows, 10);
        assert!(board.others.is_none());
    }
}
