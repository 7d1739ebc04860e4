//! Host-city lookup and the per-edition host map.
//!
//! The events table only carries the host city; the country that organized
//! each edition is resolved through a static city table, then collected into
//! a (year, season) -> country-code map.

use super::schema::{EventRecord, Season};
use log::warn;
use std::collections::HashMap;

/// Host city -> organizing country code, covering all editions in the data
const HOST_CITY_COUNTRIES: &[(&str, &str)] = &[
    ("Albertville", "FRA"),
    ("Amsterdam", "NED"),
    ("Antwerpen", "BEL"),
    ("Athina", "GRE"),
    ("Atlanta", "USA"),
    ("Barcelona", "ESP"),
    ("Beijing", "CHN"),
    ("Berlin", "GER"),
    ("Calgary", "CAN"),
    ("Chamonix", "FRA"),
    ("Cortina d'Ampezzo", "ITA"),
    ("Garmisch-Partenkirchen", "GER"),
    ("Grenoble", "FRA"),
    ("Helsinki", "FIN"),
    ("Innsbruck", "AUT"),
    ("Lake Placid", "USA"),
    ("Lillehammer", "NOR"),
    ("London", "GBR"),
    ("Los Angeles", "USA"),
    ("Melbourne", "AUS"),
    ("Mexico City", "MEX"),
    ("Montreal", "CAN"),
    ("Moskva", "RUS"),
    ("Munich", "GER"),
    ("Nagano", "JPN"),
    ("Oslo", "NOR"),
    ("Paris", "FRA"),
    ("Pyeongchang", "KOR"),
    ("Rio de Janeiro", "BRA"),
    ("Roma", "ITA"),
    ("Salt Lake City", "USA"),
    ("Sankt Moritz", "SUI"),
    ("Sapporo", "JPN"),
    ("Sarajevo", "BIH"),
    ("Seoul", "KOR"),
    ("Sochi", "RUS"),
    ("Squaw Valley", "USA"),
    ("St. Louis", "USA"),
    ("Stockholm", "SWE"),
    ("Sydney", "AUS"),
    ("Tokyo", "JPN"),
    ("Torino", "ITA"),
    ("Vancouver", "CAN"),
];

/// Resolve a host city to its organizing country code
///
/// **Public** - returns None for cities outside the known table
pub fn host_country_for_city(city: &str) -> Option<&'static str> {
    HOST_CITY_COUNTRIES
        .iter()
        .find(|(c, _)| *c == city.trim())
        .map(|(_, code)| *code)
}

/// (year, season) -> host country code for every edition present in the rows
///
/// **Public** - used to label rows as home vs away and to annotate
/// leaderboard exports
#[derive(Debug, Clone, Default)]
pub struct HostMap {
    map: HashMap<(i32, Season), String>,
}

impl HostMap {
    /// Build the host map from event records
    ///
    /// Unknown host cities are skipped with a warning; editions hosted in an
    /// unmapped city simply have no host label.
    pub fn from_events(events: &[EventRecord]) -> HostMap {
        let mut map = HashMap::new();
        let mut unknown: Vec<String> = Vec::new();

        for record in events {
            let key = (record.year, record.season);
            if map.contains_key(&key) {
                continue;
            }
            match host_country_for_city(&record.city) {
                Some(code) => {
                    map.insert(key, code.to_string());
                }
                None => {
                    if !unknown.contains(&record.city) {
                        unknown.push(record.city.clone());
                    }
                }
            }
        }

        for city in unknown {
            warn!("Unknown host city '{}', editions there carry no host label", city);
        }

        HostMap { map }
    }

    /// Host country code for one edition, if known
    pub fn host(&self, year: i32, season: Season) -> Option<&str> {
        self.map.get(&(year, season)).map(String::as_str)
    }

    /// Whether the given country hosted the given edition
    pub fn is_host(&self, noc: &str, year: i32, season: Season) -> bool {
        self.host(year, season) == Some(noc)
    }

    /// All (year, host) pairs for one season, ordered by year
    pub fn hosts_by_year(&self, season: Season) -> Vec<(i32, String)> {
        let mut hosts: Vec<(i32, String)> = self
            .map
            .iter()
            .filter(|((_, s), _)| *s == season)
            .map(|((year, _), code)| (*year, code.clone()))
            .collect();
        hosts.sort_by_key(|(year, _)| *year);
        hosts
    }
}
