//! Olympic Medal Studio CLI
//!
//! Derives the aggregate views of the Olympic data-storytelling app from the
//! raw participation and dimension tables, and writes them back as CSV plus
//! a JSON run report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use olympic_medal_studio::commands::{
    athletes, economy, host, leaderboard, multi, EconomyArgs, HostAdvantageArgs, LeaderboardArgs,
    MultiMedalistArgs, TopAthletesArgs,
};
use olympic_medal_studio::utils::config::{
    ANALYSIS_END_YEAR, DEFAULT_TOP_N, ERA_START_YEAR, EVENTS_FILE, SCHEMA_VERSION,
};

/// Olympic Medal Studio - derived tables for Olympic Games statistics
#[derive(Parser, Debug)]
#[command(name = "medal-studio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Medals per country per year for each discipline, top-N plus Others
    Leaderboard {
        /// Directory holding the input tables
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Season (Summer or Winter)
        #[arg(short, long)]
        season: String,

        /// Rank a single discipline instead of the season's full list
        #[arg(long)]
        discipline: Option<String>,

        /// First year of the window (default per season)
        #[arg(long)]
        from: Option<i32>,

        /// Last year of the window (default per season)
        #[arg(long)]
        to: Option<i32>,

        /// Number of countries to keep per discipline
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Output path for the leaderboard CSV
        #[arg(short, long, default_value = "leaderboard.csv")]
        output: PathBuf,

        /// Output path for the host-by-year CSV
        #[arg(long)]
        hosts_output: Option<PathBuf>,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Host vs away comparison per country and era
    HostAdvantage {
        /// Directory holding the input tables
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Restrict to one season (default: both)
        #[arg(short, long)]
        season: Option<String>,

        /// First year of the window
        #[arg(long, default_value_t = ERA_START_YEAR)]
        from: i32,

        /// Last year of the window
        #[arg(long, default_value_t = ANALYSIS_END_YEAR)]
        to: i32,

        /// Output path for the comparative CSV
        #[arg(short, long, default_value = "host_advantage.csv")]
        output: PathBuf,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Medal-table size merged with continent, population, GDP, and climate
    Economy {
        /// Directory holding the input tables
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Keep Summer and Winter as separate rows
        #[arg(long)]
        per_season: bool,

        /// Output path for the merged CSV
        #[arg(short, long, default_value = "economy.csv")]
        output: PathBuf,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Top countries by points and each one's top athletes
    TopAthletes {
        /// Directory holding the input tables
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Season (Summer or Winter)
        #[arg(short, long)]
        season: String,

        /// Number of countries to keep
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_countries: usize,

        /// Number of athletes to keep per country
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_athletes: usize,

        /// First year of the window (default per season)
        #[arg(long)]
        from: Option<i32>,

        /// Output path for the country ranking CSV
        #[arg(long, default_value = "top_countries.csv")]
        output_countries: PathBuf,

        /// Output path for the athlete ranking CSV
        #[arg(long, default_value = "top_athletes.csv")]
        output_athletes: PathBuf,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Country points per edition with and without multi-medalists
    MultiMedalist {
        /// Directory holding the input tables
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Season (Summer or Winter)
        #[arg(short, long)]
        season: String,

        /// Restrict the export to one country code
        #[arg(short, long)]
        country: Option<String>,

        /// First year of the window (default per season)
        #[arg(long)]
        from: Option<i32>,

        /// Output path for the comparative CSV
        #[arg(short, long, default_value = "multi_medalist.csv")]
        output: PathBuf,

        /// Output path for the JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Display input-file schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Leaderboard {
            data_dir,
            season,
            discipline,
            from,
            to,
            top,
            output,
            hosts_output,
            report,
        } => {
            let args = LeaderboardArgs {
                data_dir,
                season,
                discipline,
                year_from: from,
                year_to: to,
                top_n: top,
                output,
                hosts_output,
                report,
            };
            leaderboard::validate_args(&args)?;
            leaderboard::execute_leaderboard(args)?;
        }

        Commands::HostAdvantage {
            data_dir,
            season,
            from,
            to,
            output,
            report,
        } => {
            let args = HostAdvantageArgs {
                data_dir,
                season,
                year_from: from,
                year_to: to,
                output,
                report,
            };
            host::validate_args(&args)?;
            host::execute_host_advantage(args)?;
        }

        Commands::Economy {
            data_dir,
            per_season,
            output,
            report,
        } => {
            let args = EconomyArgs {
                data_dir,
                per_season,
                output,
                report,
            };
            economy::execute_economy(args)?;
        }

        Commands::TopAthletes {
            data_dir,
            season,
            top_countries,
            top_athletes,
            from,
            output_countries,
            output_athletes,
            report,
        } => {
            let args = TopAthletesArgs {
                data_dir,
                season,
                top_countries,
                top_athletes,
                year_from: from,
                output_countries,
                output_athletes,
                report,
            };
            athletes::validate_args(&args)?;
            athletes::execute_top_athletes(args)?;
        }

        Commands::MultiMedalist {
            data_dir,
            season,
            country,
            from,
            output,
            report,
        } => {
            let args = MultiMedalistArgs {
                data_dir,
                season,
                country,
                year_from: from,
                output,
                report,
            };
            multi::validate_args(&args)?;
            multi::execute_multi_medalist(args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display input schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Olympic Medal Studio Input Schema");
    println!("Report Schema Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Expected files in the data directory:");
        println!("  {}  - one row per athlete per event per edition", EVENTS_FILE);
        println!("    Name: string            - athlete name");
        println!("    NOC: string             - country code");
        println!("    Sport: string           - discipline");
        println!("    Event: string?          - event id (enables team-medal dedup)");
        println!("    Season: Summer|Winter   - edition season");
        println!("    Year: number            - edition year");
        println!("    City: string            - host city");
        println!("    Medal: Gold|Silver|Bronze|empty");
        println!("  all_regions.csv           - NOC to region name");
        println!("  countries_per_continent.csv - region to continent");
        println!("  SP_POP_TOTL.csv           - population, one column per year");
        println!("  WEO_database_Apre2024.csv - GDP per capita (PPPPC series)");
        println!("  average_temperature_per_country.csv - region temperature");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Olympic Medal Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Derived tables for Olympic Games statistics.");
}
