//! Filter stage: restrict event rows by season, year range, and discipline.
//!
//! The filter never mutates its input; it returns a new vector of references
//! into the immutable base table.

use crate::loader::schema::{EventRecord, Season};
use crate::utils::error::PipelineError;
use log::debug;

/// Selection parameters for one pipeline run
///
/// **Public** - the equivalent of a request
#[derive(Debug, Clone, Copy)]
pub struct FilterParams {
    /// Season to keep
    pub season: Season,

    /// Inclusive lower year bound
    pub year_from: i32,

    /// Inclusive upper year bound
    pub year_to: i32,
}

impl FilterParams {
    pub fn new(season: Season, year_from: i32, year_to: i32) -> Result<FilterParams, PipelineError> {
        if year_from > year_to {
            return Err(PipelineError::InvalidYearRange {
                from: year_from,
                to: year_to,
            });
        }
        Ok(FilterParams {
            season,
            year_from,
            year_to,
        })
    }

    fn matches(&self, record: &EventRecord) -> bool {
        record.season == self.season
            && record.year >= self.year_from
            && record.year <= self.year_to
    }
}

/// Filter events by season and inclusive year range
///
/// **Public** - first stage of every pipeline
pub fn filter_events<'a>(events: &'a [EventRecord], params: &FilterParams) -> Vec<&'a EventRecord> {
    let filtered: Vec<&EventRecord> = events.iter().filter(|e| params.matches(e)).collect();
    debug!(
        "Filter {} {}-{}: kept {} of {} rows",
        params.season,
        params.year_from,
        params.year_to,
        filtered.len(),
        events.len()
    );
    filtered
}

/// Restrict filtered rows to a single discipline
///
/// **Public** - applied after the season/year filter for per-sport views
pub fn filter_sport<'a>(records: &[&'a EventRecord], sport: &str) -> Vec<&'a EventRecord> {
    records.iter().filter(|r| r.sport == sport).copied().collect()
}
