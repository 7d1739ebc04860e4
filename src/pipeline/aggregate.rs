//! Aggregator: group filtered rows by (entity, year) and compute a metric.
//!
//! The one rule everything downstream depends on: a team medal is counted
//! once per (event, country, year, medal) no matter how many squad rows
//! share it. Rows without an event id are never merged, since there is no
//! evidence two such rows describe the same medal.

use crate::loader::schema::EventRecord;
use crate::utils::config::MULTI_MEDALIST_THRESHOLD;
use log::debug;
use std::collections::{HashMap, HashSet};

/// What to rank or merge on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKey {
    /// Country code (NOC)
    Country,
    /// Athlete name
    Athlete,
}

/// Metric computed per (entity, year) group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Number of participation rows
    RowCount,
    /// Number of medals, team events deduplicated
    MedalCount,
    /// Number of distinct athletes
    DistinctAthletes,
    /// Medal points (gold 3 / silver 2 / bronze 1), team events deduplicated
    Points,
}

/// One output row of the aggregator: (entity, time bucket, value)
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub entity: String,
    pub year: i32,
    pub value: f64,
}

/// Group records by (entity, year) and compute the metric
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `records` - filtered event rows
/// * `key` - entity to group by (country or athlete)
/// * `metric` - metric definition
///
/// # Returns
/// One row per distinct (entity, year), sorted by entity then year so output
/// order never depends on hash-map iteration.
pub fn aggregate(records: &[&EventRecord], key: EntityKey, metric: Metric) -> Vec<AggregateRow> {
    let mut groups: HashMap<(String, i32), f64> = HashMap::new();
    let mut athletes: HashMap<(String, i32), HashSet<String>> = HashMap::new();
    // Dedup set for team medals: (event, country, year, medal discriminant)
    let mut seen_medals: HashSet<(String, String, i32, u8)> = HashSet::new();

    for record in records {
        let entity = match key {
            EntityKey::Country => record.noc.clone(),
            EntityKey::Athlete => record.name.clone(),
        };
        let group = (entity, record.year);

        match metric {
            Metric::RowCount => {
                *groups.entry(group).or_insert(0.0) += 1.0;
            }
            Metric::DistinctAthletes => {
                athletes.entry(group).or_default().insert(record.name.clone());
            }
            Metric::MedalCount | Metric::Points => {
                let Some(medal) = record.medal else { continue };
                // Squad dedup only collapses country totals; an athlete's own
                // medals are never shared rows.
                if key == EntityKey::Country {
                    if let Some(event) = &record.event {
                        let dedup_key = (
                            event.clone(),
                            record.noc.clone(),
                            record.year,
                            medal as u8,
                        );
                        if !seen_medals.insert(dedup_key) {
                            // Another squad member already carried this medal
                            continue;
                        }
                    }
                }
                let value = match metric {
                    Metric::Points => medal.points() as f64,
                    _ => 1.0,
                };
                *groups.entry(group).or_insert(0.0) += value;
            }
        }
    }

    if metric == Metric::DistinctAthletes {
        for (group, names) in athletes {
            groups.insert(group, names.len() as f64);
        }
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|((entity, year), value)| AggregateRow { entity, year, value })
        .collect();
    rows.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.year.cmp(&b.year)));

    debug!(
        "Aggregated {} records into {} ({:?}, {:?}) groups",
        records.len(),
        rows.len(),
        key,
        metric
    );

    rows
}

/// Total of all aggregated values (conservation reference for the ranker)
pub fn total(rows: &[AggregateRow]) -> f64 {
    rows.iter().map(|r| r.value).sum()
}

/// Athletes who won 2+ medals in a single edition
///
/// **Public** - drives the multi-medalist dependency view. Counted on raw
/// athlete rows: an athlete's own medals are never squad-shared.
pub fn multi_medalists(records: &[&EventRecord]) -> HashSet<(String, i32)> {
    let mut medals_per_athlete_year: HashMap<(String, i32), u64> = HashMap::new();
    for record in records {
        if record.medal.is_some() {
            *medals_per_athlete_year
                .entry((record.name.clone(), record.year))
                .or_insert(0) += 1;
        }
    }

    medals_per_athlete_year
        .into_iter()
        .filter(|(_, count)| *count >= MULTI_MEDALIST_THRESHOLD)
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::schema::{Medal, Season};

    fn record(name: &str, noc: &str, year: i32, event: Option<&str>, medal: Option<Medal>) -> EventRecord {
        EventRecord {
            name: name.to_string(),
            noc: noc.to_string(),
            sport: "Swimming".to_string(),
            event: event.map(str::to_string),
            season: Season::Summer,
            year,
            city: "City".to_string(),
            medal,
        }
    }

    #[test]
    fn test_team_medal_counted_once() {
        // Five squad rows sharing one gold for one team event
        let events: Vec<EventRecord> = (0..5)
            .map(|i| {
                record(
                    &format!("Athlete {}", i),
                    "USA",
                    2008,
                    Some("4x100m Relay"),
                    Some(Medal::Gold),
                )
            })
            .collect();
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Country, Metric::MedalCount);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 1.0);
    }

    #[test]
    fn test_separate_golds_without_event_id() {
        // Two different athletes' golds with no shared event id stay distinct
        let events = vec![
            record("A", "USA", 2008, None, Some(Medal::Gold)),
            record("B", "USA", 2008, None, Some(Medal::Gold)),
            record("C", "CHN", 2008, None, Some(Medal::Silver)),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Country, Metric::MedalCount);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], AggregateRow { entity: "CHN".to_string(), year: 2008, value: 1.0 });
        assert_eq!(rows[1], AggregateRow { entity: "USA".to_string(), year: 2008, value: 2.0 });
    }

    #[test]
    fn test_points_deduplicated() {
        let events = vec![
            record("A", "USA", 2008, Some("Relay"), Some(Medal::Gold)),
            record("B", "USA", 2008, Some("Relay"), Some(Medal::Gold)),
            record("C", "USA", 2008, Some("100m"), Some(Medal::Bronze)),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Country, Metric::Points);
        // One gold (3) + one bronze (1)
        assert_eq!(rows[0].value, 4.0);
    }

    #[test]
    fn test_athlete_counts_not_squad_deduplicated() {
        // Both relay members keep their own gold at athlete granularity
        let events = vec![
            record("A", "USA", 2008, Some("Relay"), Some(Medal::Gold)),
            record("B", "USA", 2008, Some("Relay"), Some(Medal::Gold)),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Athlete, Metric::MedalCount);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 1.0);
        assert_eq!(rows[1].value, 1.0);
    }

    #[test]
    fn test_distinct_athletes() {
        let events = vec![
            record("A", "USA", 2008, Some("100m"), None),
            record("A", "USA", 2008, Some("200m"), None),
            record("B", "USA", 2008, Some("100m"), None),
            record("A", "USA", 2012, Some("100m"), None),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Country, Metric::DistinctAthletes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 2.0); // 2008: A, B
        assert_eq!(rows[1].value, 1.0); // 2012: A
    }

    #[test]
    fn test_row_count_by_athlete() {
        let events = vec![
            record("A", "USA", 2008, None, None),
            record("A", "USA", 2008, None, None),
            record("B", "USA", 2008, None, None),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let rows = aggregate(&refs, EntityKey::Athlete, Metric::RowCount);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entity, "A");
        assert_eq!(rows[0].value, 2.0);
    }

    #[test]
    fn test_multi_medalists() {
        let events = vec![
            record("A", "USA", 2008, Some("100m"), Some(Medal::Gold)),
            record("A", "USA", 2008, Some("200m"), Some(Medal::Silver)),
            record("B", "USA", 2008, Some("100m"), Some(Medal::Bronze)),
            record("A", "USA", 2012, Some("100m"), Some(Medal::Gold)),
        ];
        let refs: Vec<&EventRecord> = events.iter().collect();

        let multi = multi_medalists(&refs);
        assert!(multi.contains(&("A".to_string(), 2008)));
        assert!(!multi.contains(&("B".to_string(), 2008)));
        assert!(!multi.contains(&("A".to_string(), 2012)));
    }
}
