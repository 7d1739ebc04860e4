//! Comparative reshaper: pivot long condition rows into paired wide columns.
//!
//! One row per (entity, period, condition) becomes one row per
//! (entity, period) with each metric column duplicated and suffixed per
//! condition (e.g. `medals_Host`, `medals_Away`). A missing condition yields
//! missing values, never an absent row and never an error.

use crate::utils::error::PipelineError;
use log::warn;
use std::collections::BTreeMap;

/// One long-format input row
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub entity: String,
    pub period: String,
    pub condition: String,
    /// Metric name -> value; None is an explicit missing value
    pub metrics: BTreeMap<String, Option<f64>>,
}

impl LongRow {
    pub fn new(entity: &str, period: &str, condition: &str) -> LongRow {
        LongRow {
            entity: entity.to_string(),
            period: period.to_string(),
            condition: condition.to_string(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: &str, value: Option<f64>) -> LongRow {
        self.metrics.insert(name.to_string(), value);
        self
    }
}

/// One wide-format output row: metric columns suffixed per condition
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub entity: String,
    pub period: String,
    /// "metric_Condition" -> value
    pub values: BTreeMap<String, Option<f64>>,
}

impl WideRow {
    /// Value of one metric under one condition
    pub fn value(&self, metric: &str, condition: &str) -> Option<f64> {
        self.values
            .get(&column_name(metric, condition))
            .copied()
            .flatten()
    }
}

/// Wide column name for a metric under a condition
pub fn column_name(metric: &str, condition: &str) -> String {
    format!("{}_{}", metric, condition)
}

/// Pivot long rows to wide
///
/// **Public** - main entry point for comparative reshaping
///
/// # Arguments
/// * `rows` - long rows, at most one per (entity, period, condition)
/// * `conditions` - the condition pair (or set) defining the column suffixes
/// * `metrics` - metric columns to carry over
///
/// # Returns
/// One row per (entity, period), ordered by entity then period. Every
/// condition's columns are present on every row; combinations absent from
/// the input hold None.
///
/// # Errors
/// * `PipelineError::DuplicateCondition` - two input rows share
///   (entity, period, condition); that is an upstream aggregation bug and
///   silently aggregating here would desynchronize the column pairs
pub fn pivot_wide(
    rows: &[LongRow],
    conditions: &[&str],
    metrics: &[&str],
) -> Result<Vec<WideRow>, PipelineError> {
    let mut wide: BTreeMap<(String, String), WideRow> = BTreeMap::new();
    let mut seen: Vec<(String, String, String)> = Vec::new();

    for row in rows {
        if !conditions.contains(&row.condition.as_str()) {
            warn!(
                "Dropping row with unexpected condition '{}' for entity '{}'",
                row.condition, row.entity
            );
            continue;
        }

        let seen_key = (row.entity.clone(), row.period.clone(), row.condition.clone());
        if seen.contains(&seen_key) {
            return Err(PipelineError::DuplicateCondition {
                entity: row.entity.clone(),
                period: row.period.clone(),
                condition: row.condition.clone(),
            });
        }
        seen.push(seen_key);

        let key = (row.entity.clone(), row.period.clone());
        let entry = wide.entry(key).or_insert_with(|| {
            let mut values = BTreeMap::new();
            for condition in conditions {
                for metric in metrics {
                    values.insert(column_name(metric, condition), None);
                }
            }
            WideRow {
                entity: row.entity.clone(),
                period: row.period.clone(),
                values,
            }
        });

        for metric in metrics {
            let value = row.metrics.get(*metric).copied().flatten();
            entry
                .values
                .insert(column_name(metric, &row.condition), value);
        }
    }

    Ok(wide.into_values().collect())
}

/// Melt wide rows back to long form
///
/// **Public** - inverse of `pivot_wide`. Conditions whose columns are all
/// None on a row are omitted, so a pivot of rows that each carry at least
/// one value round-trips exactly.
pub fn melt_long(rows: &[WideRow], conditions: &[&str], metrics: &[&str]) -> Vec<LongRow> {
    let mut long = Vec::new();
    for row in rows {
        for condition in conditions {
            let mut out = LongRow::new(&row.entity, &row.period, condition);
            let mut any_value = false;
            for metric in metrics {
                let value = row.value(metric, condition);
                any_value |= value.is_some();
                out.metrics.insert((*metric).to_string(), value);
            }
            if any_value {
                long.push(out);
            }
        }
    }
    long
}

/// Per-condition ratio metric; division by zero is a missing value
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Round for display only - never feed the result back into arithmetic
pub fn round_display(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
