//! Typed row definitions for the loaded tables.
//!
//! One struct per input table, produced by the loader after schema
//! normalization. These are the immutable inputs to every pipeline run.

use crate::utils::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Olympic season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl FromStr for Season {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Season::Summer),
            "winter" => Ok(Season::Winter),
            _ => Err(PipelineError::UnknownSeason(s.to_string())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Summer => write!(f, "Summer"),
            Season::Winter => write!(f, "Winter"),
        }
    }
}

/// Medal won by an athlete in one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Leaderboard points for this medal (gold 3 / silver 2 / bronze 1)
    pub fn points(&self) -> u64 {
        match self {
            Medal::Gold => 3,
            Medal::Silver => 2,
            Medal::Bronze => 1,
        }
    }

    /// Parse a medal cell; empty cells and "NA" markers mean no medal
    pub fn parse(value: &str) -> Option<Medal> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gold" | "or" => Some(Medal::Gold),
            "silver" | "argent" => Some(Medal::Silver),
            "bronze" => Some(Medal::Bronze),
            _ => None,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medal::Gold => write!(f, "Gold"),
            Medal::Silver => write!(f, "Silver"),
            Medal::Bronze => write!(f, "Bronze"),
        }
    }
}

/// One athlete participation in one event of one edition
///
/// **Public** - the universe of truth for all derived tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Athlete name
    pub name: String,

    /// Country code (NOC)
    pub noc: String,

    /// Sport / discipline
    pub sport: String,

    /// Event identifier inside the discipline, when the source provides one.
    /// Team-medal deduplication only applies to rows that carry an event id.
    pub event: Option<String>,

    /// Season of the edition
    pub season: Season,

    /// Year of the edition
    pub year: i32,

    /// Host city of the edition
    pub city: String,

    /// Medal won, if any
    pub medal: Option<Medal>,
}

/// NOC -> region name mapping (all_regions.csv)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRow {
    pub noc: String,
    pub region: String,
}

/// Region -> continent mapping (time-invariant dimension)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentRow {
    pub region: String,
    pub continent: String,
}

/// Population of a region in one year (melted from the wide source file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationRow {
    pub region: String,
    pub year: i32,
    pub population: f64,
}

/// GDP per capita (PPP) of a region in one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdpRow {
    pub iso: String,
    pub region: String,
    pub year: i32,
    pub gdp_per_capita: f64,
}

/// Climate class derived from average yearly temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Climate {
    Hot,
    Moderate,
    Cold,
}

impl Climate {
    /// Classify an average temperature in degrees Celsius
    pub fn from_average_temperature(celsius: f64) -> Climate {
        use crate::utils::config::{COLD_CLIMATE_MAX_C, HOT_CLIMATE_MIN_C};
        if celsius > HOT_CLIMATE_MIN_C {
            Climate::Hot
        } else if celsius > COLD_CLIMATE_MAX_C {
            Climate::Moderate
        } else {
            Climate::Cold
        }
    }

    /// Display label matching the exported tables
    pub fn label(&self) -> &'static str {
        match self {
            Climate::Hot => "Hot climate (>25 C)",
            Climate::Moderate => "Moderate climate (5 C-25 C)",
            Climate::Cold => "Cold climate (<=5 C)",
        }
    }
}

/// Region -> climate class mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateRow {
    pub region: String,
    pub climate: Climate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_from_str() {
        assert_eq!("Summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("winter".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!(" SUMMER ".parse::<Season>().unwrap(), Season::Summer);
    }

    #[test]
    fn test_season_from_str_unknown() {
        let err = "Spring".parse::<Season>().unwrap_err();
        assert!(err.to_string().contains("Spring"));
    }

    #[test]
    fn test_medal_parse() {
        assert_eq!(Medal::parse("Gold"), Some(Medal::Gold));
        assert_eq!(Medal::parse("bronze"), Some(Medal::Bronze));
        assert_eq!(Medal::parse(""), None);
        assert_eq!(Medal::parse("NA"), None);
    }

    #[test]
    fn test_medal_points() {
        assert_eq!(Medal::Gold.points(), 3);
        assert_eq!(Medal::Silver.points(), 2);
        assert_eq!(Medal::Bronze.points(), 1);
    }

    #[test]
    fn test_climate_classification() {
        assert_eq!(Climate::from_average_temperature(27.3), Climate::Hot);
        assert_eq!(Climate::from_average_temperature(12.0), Climate::Moderate);
        assert_eq!(Climate::from_average_temperature(5.0), Climate::Cold);
        assert_eq!(Climate::from_average_temperature(-4.1), Climate::Cold);
    }
}
