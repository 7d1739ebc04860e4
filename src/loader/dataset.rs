//! Explicit dataset loading.
//!
//! Nothing is loaded at static-init time: commands call `Dataset::load` (and
//! `DimensionTables::load` when they need auxiliary dimensions) once, then
//! pass the immutable handles to every pipeline call. This keeps tests
//! hermetic and the base tables read-only for the process lifetime.

use super::csv::{parse_number, parse_year, Table};
use super::schema::{
    Climate, ClimateRow, ContinentRow, EventRecord, GdpRow, Medal, PopulationRow, RegionRow,
    Season,
};
use crate::utils::config::{
    CITY_FIELD_NAMES, CONTINENTS_FILE, COUNTRY_FIELD_NAMES, EVENTS_FILE, EVENT_FIELD_NAMES,
    GDP_FILE, MEDAL_FIELD_NAMES, NAME_FIELD_NAMES, POPULATION_FILE, REGIONS_FILE,
    SEASON_FIELD_NAMES, SPORT_FIELD_NAMES, TEMPERATURE_FILE, YEAR_FIELD_NAMES,
};
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// GDP series kept from the WEO export (PPP per capita)
const GDP_SUBJECT_CODE: &str = "PPPPC";

/// Last plausible year in the GDP projections
const GDP_MAX_YEAR: i32 = 2025;

/// The immutable base dataset: every pipeline run starts from these rows
///
/// **Public** - loaded once, shared read-only by all requests
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All athlete participation rows
    pub events: Vec<EventRecord>,

    /// Country codes present in the events (for request validation)
    known_countries: HashSet<String>,
}

impl Dataset {
    /// Load the events table from the data directory
    ///
    /// **Public** - main entry point for dataset loading
    ///
    /// # Errors
    /// * `LoadError` variants for I/O, CSV, or missing-column failures
    ///
    /// Rows with an unparseable year or season are skipped with a warning;
    /// a malformed row must never abort the whole load.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Dataset, LoadError> {
        let path = data_dir.as_ref().join(EVENTS_FILE);
        info!("Loading events from: {}", path.display());

        let table = Table::read(&path)?;
        let name_col = table.require_column(NAME_FIELD_NAMES)?;
        let noc_col = table.require_column(COUNTRY_FIELD_NAMES)?;
        let sport_col = table.require_column(SPORT_FIELD_NAMES)?;
        let season_col = table.require_column(SEASON_FIELD_NAMES)?;
        let year_col = table.require_column(YEAR_FIELD_NAMES)?;
        let city_col = table.require_column(CITY_FIELD_NAMES)?;
        let medal_col = table.require_column(MEDAL_FIELD_NAMES)?;
        // Event id is optional: without it, team-medal rows cannot be merged
        let event_col = table.column(EVENT_FIELD_NAMES);

        let mut events = Vec::with_capacity(table.rows.len());
        let mut skipped = 0usize;

        for row in &table.rows {
            let year = match parse_year(table.cell(row, year_col)) {
                Some(year) => year,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let season = match Season::from_str(table.cell(row, season_col)) {
                Ok(season) => season,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            let event = event_col
                .map(|idx| table.cell(row, idx))
                .filter(|cell| !cell.is_empty())
                .map(str::to_string);

            events.push(EventRecord {
                name: table.cell(row, name_col).to_string(),
                noc: table.cell(row, noc_col).to_string(),
                sport: table.cell(row, sport_col).to_string(),
                event,
                season,
                year,
                city: table.cell(row, city_col).to_string(),
                medal: Medal::parse(table.cell(row, medal_col)),
            });
        }

        if skipped > 0 {
            warn!("Skipped {} malformed event rows", skipped);
        }
        if events.is_empty() {
            return Err(LoadError::EmptyTable(EVENTS_FILE.to_string()));
        }

        let known_countries = events.iter().map(|e| e.noc.clone()).collect();
        info!("Loaded {} event records", events.len());

        Ok(Dataset {
            events,
            known_countries,
        })
    }

    /// Whether a country code appears anywhere in the events
    pub fn knows_country(&self, noc: &str) -> bool {
        self.known_countries.contains(noc)
    }
}

/// Auxiliary dimension tables for the cross-table merger
///
/// **Public** - loaded on demand by the commands that join against them
#[derive(Debug, Clone)]
pub struct DimensionTables {
    /// NOC -> region name
    pub regions: Vec<RegionRow>,

    /// Region -> continent (time-invariant)
    pub continents: Vec<ContinentRow>,

    /// Region population per year (melted from the wide source)
    pub population: Vec<PopulationRow>,

    /// Region GDP per capita (PPP) per year
    pub gdp: Vec<GdpRow>,

    /// Region -> climate class
    pub climate: Vec<ClimateRow>,
}

impl DimensionTables {
    /// Load all dimension tables from the data directory
    pub fn load(data_dir: impl AsRef<Path>) -> Result<DimensionTables, LoadError> {
        let dir = data_dir.as_ref();
        info!("Loading dimension tables from: {}", dir.display());

        let tables = DimensionTables {
            regions: load_regions(&dir.join(REGIONS_FILE))?,
            continents: load_continents(&dir.join(CONTINENTS_FILE))?,
            population: load_population(&dir.join(POPULATION_FILE))?,
            gdp: load_gdp(&dir.join(GDP_FILE))?,
            climate: load_climate(&dir.join(TEMPERATURE_FILE))?,
        };

        info!(
            "Dimensions loaded: {} regions, {} continents, {} population rows, {} GDP rows, {} climate rows",
            tables.regions.len(),
            tables.continents.len(),
            tables.population.len(),
            tables.gdp.len(),
            tables.climate.len()
        );

        Ok(tables)
    }
}

/// Load the NOC -> region mapping
fn load_regions(path: &Path) -> Result<Vec<RegionRow>, LoadError> {
    let table = Table::read(path)?;
    let noc_col = table.require_column(COUNTRY_FIELD_NAMES)?;
    let region_col = table.require_column(&["region"])?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let noc = table.cell(row, noc_col);
            let region = table.cell(row, region_col);
            if noc.is_empty() || region.is_empty() {
                return None;
            }
            Some(RegionRow {
                noc: noc.to_string(),
                region: region.to_string(),
            })
        })
        .collect())
}

/// Load the region -> continent mapping
fn load_continents(path: &Path) -> Result<Vec<ContinentRow>, LoadError> {
    let table = Table::read(path)?;
    let region_col = table.require_column(&["country", "region"])?;
    let continent_col = table.require_column(&["continent"])?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let region = table.cell(row, region_col);
            let continent = table.cell(row, continent_col);
            if region.is_empty() || continent.is_empty() {
                return None;
            }
            Some(ContinentRow {
                region: region.to_string(),
                continent: continent.to_string(),
            })
        })
        .collect())
}

/// Load and melt the wide population table (one column per year)
fn load_population(path: &Path) -> Result<Vec<PopulationRow>, LoadError> {
    let table = Table::read(path)?;
    let region_col = table.require_column(&["country name", "region"])?;
    let year_cols = table.year_columns();

    let mut rows = Vec::new();
    for row in &table.rows {
        let region = table.cell(row, region_col);
        if region.is_empty() {
            continue;
        }
        for &(idx, year) in &year_cols {
            // Unparseable cells are missing values, not load failures
            if let Some(population) = parse_number(table.cell(row, idx)) {
                rows.push(PopulationRow {
                    region: region.to_string(),
                    year,
                    population,
                });
            }
        }
    }

    debug!("Melted population table into {} long rows", rows.len());
    Ok(rows)
}

/// Load and melt the WEO GDP table, keeping only the PPP-per-capita series
fn load_gdp(path: &Path) -> Result<Vec<GdpRow>, LoadError> {
    let table = Table::read(path)?;
    let iso_col = table.require_column(&["iso"])?;
    let subject_col = table.require_column(&["weo subject code"])?;
    let country_col = table.require_column(&["country"])?;
    let year_cols = table.year_columns();

    let mut rows = Vec::new();
    for row in &table.rows {
        if table.cell(row, subject_col) != GDP_SUBJECT_CODE {
            continue;
        }
        let iso = table.cell(row, iso_col);
        let region = table.cell(row, country_col);
        if region.is_empty() {
            continue;
        }
        for &(idx, year) in &year_cols {
            if year > GDP_MAX_YEAR {
                continue;
            }
            if let Some(gdp_per_capita) = parse_number(table.cell(row, idx)) {
                rows.push(GdpRow {
                    iso: iso.to_string(),
                    region: region.to_string(),
                    year,
                    gdp_per_capita,
                });
            }
        }
    }

    debug!("Melted GDP table into {} long rows", rows.len());
    Ok(rows)
}

/// Load average temperatures and classify each region's climate
fn load_climate(path: &Path) -> Result<Vec<ClimateRow>, LoadError> {
    let table = Table::read(path)?;
    let region_col = table.require_column(&["region", "country"])?;
    let temp_col = table.require_column(&["average temperature"])?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let region = table.cell(row, region_col);
            let celsius = parse_number(table.cell(row, temp_col))?;
            if region.is_empty() {
                return None;
            }
            Some(ClimateRow {
                region: region.to_string(),
                climate: Climate::from_average_temperature(celsius),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_events(dir: &Path, content: &str) {
        fs::write(dir.join(EVENTS_FILE), content).unwrap();
    }

    #[test]
    fn test_load_dataset() {
        let dir = TempDir::new().unwrap();
        write_events(
            dir.path(),
            "Name,NOC,Sport,Event,Season,Year,City,Medal\n\
             Phelps,USA,Swimming,200m Fly,Summer,2008,Beijing,Gold\n\
             Bolt,JAM,Athletics,100m,Summer,2008,Beijing,Gold\n\
             NoMedal,FRA,Fencing,Foil,Summer,2008,Beijing,\n",
        );

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.events.len(), 3);
        assert!(dataset.knows_country("USA"));
        assert!(!dataset.knows_country("XYZ"));
        assert_eq!(dataset.events[0].medal, Some(Medal::Gold));
        assert_eq!(dataset.events[2].medal, None);
        assert_eq!(dataset.events[0].event.as_deref(), Some("200m Fly"));
    }

    #[test]
    fn test_load_dataset_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        write_events(
            dir.path(),
            "Name,NOC,Sport,Season,Year,City,Medal\n\
             Good,USA,Swimming,Summer,2008,Beijing,Gold\n\
             BadYear,USA,Swimming,Summer,not-a-year,Beijing,Gold\n\
             BadSeason,USA,Swimming,Spring,2008,Beijing,Gold\n",
        );

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.events.len(), 1);
        assert_eq!(dataset.events[0].name, "Good");
        // No event column: rows carry no event id
        assert!(dataset.events[0].event.is_none());
    }

    #[test]
    fn test_load_dataset_missing_column() {
        let dir = TempDir::new().unwrap();
        write_events(dir.path(), "Name,Sport,Season,Year,City,Medal\n");

        let err = Dataset::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_gdp_filters_subject() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(GDP_FILE),
            "\u{feff}ISO,WEO Subject Code,Country,Units,2019,2020\n\
             FRA,PPPPC,France,USD,\"48,640.2\",47000\n\
             FRA,NGDP,France,USD,999,999\n",
        )
        .unwrap();

        let rows = load_gdp(&dir.path().join(GDP_FILE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "France");
        assert_eq!(rows[0].year, 2019);
        assert!((rows[0].gdp_per_capita - 48640.2).abs() < 1e-9);
    }

    #[test]
    fn test_load_population_melts_years() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(POPULATION_FILE),
            "Country Name,1990,1991\nFrance,56000000,bad\n",
        )
        .unwrap();

        let rows = load_population(&dir.path().join(POPULATION_FILE)).unwrap();
        // The malformed 1991 cell becomes a missing value, not an error
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 1990);
    }

    #[test]
    fn test_load_climate_classifies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(TEMPERATURE_FILE),
            "Region,Average Temperature\nBrazil,25.9\nNorway,1.5\n",
        )
        .unwrap();

        let rows = load_climate(&dir.path().join(TEMPERATURE_FILE)).unwrap();
        assert_eq!(rows[0].climate, Climate::Hot);
        assert_eq!(rows[1].climate, Climate::Cold);
    }
}
