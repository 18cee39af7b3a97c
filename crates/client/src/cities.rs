//! US city list loading.
//!
//! Reads the simplemaps `uscities.csv` export: a header row, then one row per
//! city with the city name in column 0 and the two-letter state id in column 2.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use citycmp_core::{CityRecord, Error};

const CITY_COLUMN: usize = 0;
const STATE_COLUMN: usize = 2;

/// Load every city of `state` from a cities CSV file.
pub fn load_state_cities(path: &Path, state: &str) -> Result<Vec<CityRecord>, Error> {
    let file = std::fs::File::open(path).map_err(|e| Error::Io { path: path.to_path_buf(), message: e.to_string() })?;
    let cities = read_state_cities(file, state).map_err(|e| match e {
        Error::Parse(message) => Error::Io { path: path.to_path_buf(), message },
        other => other,
    })?;

    tracing::debug!(path = %path.display(), state, cities = cities.len(), "loaded city list");
    Ok(cities)
}

/// Read the cities of `state` from CSV data.
pub fn read_state_cities(reader: impl Read, state: &str) -> Result<Vec<CityRecord>, Error> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let mut cities = Vec::new();

    for record in csv.records() {
        let record = record.map_err(|e| Error::Parse(e.to_string()))?;
        let (Some(city), Some(row_state)) = (record.get(CITY_COLUMN), record.get(STATE_COLUMN)) else {
            continue;
        };
        if row_state.eq_ignore_ascii_case(state) {
            cities.push(CityRecord { city: city.to_string(), state: row_state.to_string() });
        }
    }

    Ok(cities)
}

/// Normalize a typed city name: trimmed, lowercased, single-spaced.
///
/// Only alphabetic words are accepted.
pub fn parse_city_input(input: &str) -> Result<String, Error> {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.is_empty() {
        return Err(Error::InvalidInput("city name cannot be empty".into()));
    }
    if !words.iter().all(|word| word.chars().all(char::is_alphabetic)) {
        return Err(Error::InvalidInput(format!("city name must contain only letters: {}", input.trim())));
    }
    Ok(words.join(" ").to_lowercase())
}

/// Lowercased city names for membership checks against user input.
pub fn city_names_lowercase(cities: &[CityRecord]) -> BTreeSet<String> {
    cities.iter().map(|c| c.city.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = r#""city","city_ascii","state_id","state_name","county_fips","population"
"Detroit","Detroit","MI","Michigan","26163","3506126"
"Ann Arbor","Ann Arbor","MI","Michigan","26161","306022"
"South Creek","South Creek","WA","Washington","53053","2500"
"Toledo","Toledo","OH","Ohio","39095","497217"
"#;

    #[test]
    fn test_read_state_cities() {
        let cities = read_state_cities(CSV.as_bytes(), "MI").unwrap();
        assert_eq!(
            cities,
            vec![
                CityRecord { city: "Detroit".into(), state: "MI".into() },
                CityRecord { city: "Ann Arbor".into(), state: "MI".into() },
            ]
        );
    }

    #[test]
    fn test_state_match_is_case_insensitive() {
        let cities = read_state_cities(CSV.as_bytes(), "oh").unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].state, "OH");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let data = "city,city_ascii,state_id\nLonely\nLansing,Lansing,MI\n";
        let cities = read_state_cities(data.as_bytes(), "MI").unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].city, "Lansing");
    }

    #[test]
    fn test_city_names_lowercase() {
        let cities = read_state_cities(CSV.as_bytes(), "MI").unwrap();
        let names = city_names_lowercase(&cities);
        assert!(names.contains("ann arbor"));
        assert!(names.contains("detroit"));
        assert!(!names.contains("toledo"));
    }

    #[test]
    fn test_parse_city_input() {
        assert_eq!(parse_city_input("  Ann   ARBOR ").unwrap(), "ann arbor");
        assert_eq!(parse_city_input("detroit").unwrap(), "detroit");
    }

    #[test]
    fn test_parse_city_input_rejects_non_letters() {
        assert!(matches!(parse_city_input(""), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_city_input("   "), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_city_input("Detroit2"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_city_input("x'; DROP TABLE Locations;--"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_state_cities(Path::new("/nonexistent/uscities.csv"), "MI");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uscities.csv");
        std::fs::write(&path, CSV).unwrap();
        assert_eq!(load_state_cities(&path, "MI").unwrap().len(), 2);
    }
}
