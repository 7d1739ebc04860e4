//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the pipeline stages to produce one derived view.

pub mod athletes;
pub mod economy;
pub mod host;
pub mod leaderboard;
pub mod multi;

// Re-export main command functions
pub use athletes::{execute_top_athletes, TopAthletesArgs};
pub use economy::{execute_economy, EconomyArgs};
pub use host::{execute_host_advantage, HostAdvantageArgs};
pub use leaderboard::{execute_leaderboard, LeaderboardArgs};
pub use multi::{execute_multi_medalist, MultiMedalistArgs};
