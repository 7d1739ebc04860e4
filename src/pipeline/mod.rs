//! The derivation pipeline: filter, aggregate, rank, merge, reshape.
//!
//! Data flows one direction. Every stage is a pure function of its inputs
//! and produces a new table; nothing mutates a previous stage's output.

pub mod aggregate;
pub mod filter;
pub mod merge;
pub mod rank;
pub mod reshape;

// Re-export main types and functions
pub use aggregate::{aggregate, multi_medalists, total, AggregateRow, EntityKey, Metric};
pub use filter::{filter_events, filter_sport, FilterParams};
pub use merge::{era_label, finalize, merge_dimensions, EraAverageRow, MergeReport, MergedRow};
pub use rank::{rank_top_n, Leaderboard, LeaderboardEntry, OTHERS_LABEL};
pub use reshape::{
    column_name, melt_long, pivot_wide, ratio, round_display, LongRow, WideRow,
};
