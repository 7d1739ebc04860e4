//! Configuration and constants for the CLI.

/// Current run report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default leaderboard truncation (top N entities, remainder folded into Others)
pub const DEFAULT_TOP_N: usize = 10;

/// First year of modern-era analysis windows
pub const ERA_START_YEAR: i32 = 1945;

/// Last edition covered by the source data
pub const ANALYSIS_END_YEAR: i32 = 2020;

/// Default first year for Summer leaderboards (first post-1991 Summer edition)
pub const SUMMER_START_YEAR: i32 = 1992;

/// Default first year for Winter leaderboards (first post-1991 Winter edition)
pub const WINTER_START_YEAR: i32 = 1994;

/// Last year of the early era for the host-advantage view (1945-1991 / 1992-2020)
pub const HOST_ERA_SPLIT_YEAR: i32 = 1991;

/// Last year of the early era for the economy view (1945-1990 / 1991-2020)
pub const ECONOMY_ERA_SPLIT_YEAR: i32 = 1990;

/// An athlete with this many medals in one edition counts as a multi-medalist
pub const MULTI_MEDALIST_THRESHOLD: u64 = 2;

// Climate classification from average yearly temperature (degrees Celsius)
pub const HOT_CLIMATE_MIN_C: f64 = 25.0;
pub const COLD_CLIMATE_MAX_C: f64 = 5.0;

// Default input file names inside the data directory. Kept identical to the
// files the presentation layer already ships with.
pub const EVENTS_FILE: &str = "all_athlete_games.csv";
pub const REGIONS_FILE: &str = "all_regions.csv";
pub const GDP_FILE: &str = "WEO_database_Apre2024.csv";
pub const CONTINENTS_FILE: &str = "countries_per_continent.csv";
pub const POPULATION_FILE: &str = "SP_POP_TOTL.csv";
pub const TEMPERATURE_FILE: &str = "average_temperature_per_country.csv";

// Header aliases for event-table columns (differently-sourced exports use
// different names; headers are lowercased before matching)
pub const NAME_FIELD_NAMES: &[&str] = &["name", "athlete", "athlete name"];
pub const COUNTRY_FIELD_NAMES: &[&str] = &["noc", "country", "country code"];
pub const TEAM_FIELD_NAMES: &[&str] = &["team"];
pub const SPORT_FIELD_NAMES: &[&str] = &["sport", "discipline"];
pub const EVENT_FIELD_NAMES: &[&str] = &["event"];
pub const SEASON_FIELD_NAMES: &[&str] = &["season"];
pub const YEAR_FIELD_NAMES: &[&str] = &["year", "ann\u{e9}e"];
pub const CITY_FIELD_NAMES: &[&str] = &["city", "host city"];
pub const MEDAL_FIELD_NAMES: &[&str] = &["medal", "m\u{e9}daille"];

/// Summer disciplines driving the per-sport leaderboard view
pub const SUMMER_SPORTS: &[&str] = &[
    "Athletics",
    "Badminton",
    "Basketball",
    "Boxing",
    "Canoeing",
    "Cycling",
    "Fencing",
    "Football",
    "Gymnastics",
    "Handball",
    "Judo",
    "Rowing",
    "Sailing",
    "Swimming",
    "Weightlifting",
    "Wrestling",
];

/// Winter disciplines driving the per-sport leaderboard view
pub const WINTER_SPORTS: &[&str] = &[
    "Alpine Skiing",
    "Biathlon",
    "Bobsleigh",
    "Cross Country Skiing",
    "Curling",
    "Figure Skating",
    "Ice Hockey",
    "Luge",
    "Nordic Combined",
    "Ski Jumping",
    "Skeleton",
    "Snowboarding",
];
