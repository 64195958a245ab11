//! Row and record types for every table the collectors read or write.
//!
//! Input rows derive `Deserialize` only and tolerate missing cells (every
//! field except the identifying key is optional). Output records derive
//! `Serialize` and implement [`TableRecord`] so an empty table still gets its
//! header row. Absent values stay `None` and are written as empty cells.

use crate::outputs::csv::TableRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the semicolon-delimited location table that drives both collectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRow {
    pub location_id: i64,
    pub name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// IANA timezone label; falls back to the configured default when empty.
    pub tz: Option<String>,
}

/// One row of the world-city table the seed locations are cut from.
///
/// Only the columns used downstream are declared; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldCity {
    pub city: String,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A seed location as written by `seed-cities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedLocation {
    pub name: String,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz: String,
}

impl TableRecord for SeedLocation {
    const HEADERS: &'static [&'static str] = &["name", "country", "lat", "lon", "tz"];
}

/// A place returned by the attraction search, flattened.
///
/// `location_id` references the [`LocationRow`] the search was issued for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionRecord {
    pub location_id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub source: String,
}

impl TableRecord for AttractionRecord {
    const HEADERS: &'static [&'static str] = &[
        "location_id",
        "name",
        "category",
        "rating",
        "lat",
        "lon",
        "source",
    ];
}

/// One day of archived weather for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub location_id: i64,
    pub on_date: String,
    pub min_temp_c: Option<f64>,
    pub max_temp_c: Option<f64>,
    pub precip_mm: Option<f64>,
    pub conditions: String,
    pub source: String,
}

impl TableRecord for WeatherRecord {
    const HEADERS: &'static [&'static str] = &[
        "location_id",
        "on_date",
        "min_temp_c",
        "max_temp_c",
        "precip_mm",
        "conditions",
        "source",
    ];
}

/// An attraction row as read back by the cleaning step.
///
/// Every cell is kept as raw text so coercion failures can be handled per
/// column instead of rejecting the whole file. Any column not named here is
/// dropped on read; `cleaning::dropped_columns` reports which ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAttraction {
    pub location_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub source: Option<String>,
}

/// An attraction that survived cleaning. Name and coordinates are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanAttraction {
    pub location_id: Option<String>,
    pub name: String,
    pub category: String,
    pub rating: f64,
    pub lat: f64,
    pub lon: f64,
    pub source: String,
}

impl TableRecord for CleanAttraction {
    const HEADERS: &'static [&'static str] = AttractionRecord::HEADERS;
}

/// Synthetic busyness of one attraction during one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityRecord {
    pub pop_id: u32,
    pub attraction_id: u32,
    pub on_date: NaiveDate,
    pub hour: u32,
    pub busyness_index: u8,
}

impl TableRecord for PopularityRecord {
    const HEADERS: &'static [&'static str] =
        &["pop_id", "attraction_id", "on_date", "hour", "busyness_index"];
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serialize one record with serde-generated headers and compare them to
    /// the declared header list.
    fn serde_headers<T: Serialize>(record: &T) -> Vec<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(record).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        text.lines()
            .next()
            .unwrap()
            .split(',')
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_attraction_headers_match_fields() {
        let record = AttractionRecord {
            location_id: 1,
            name: Some("Louvre".to_string()),
            category: None,
            rating: Some(4.7),
            lat: Some(48.86),
            lon: Some(2.33),
            source: "Google Places New".to_string(),
        };
        assert_eq!(serde_headers(&record), AttractionRecord::HEADERS);
    }

    #[test]
    fn test_weather_headers_match_fields() {
        let record = WeatherRecord {
            location_id: 7,
            on_date: "2025-10-20".to_string(),
            min_temp_c: Some(3.1),
            max_temp_c: None,
            precip_mm: Some(0.0),
            conditions: "Clear".to_string(),
            source: "Open-Meteo".to_string(),
        };
        assert_eq!(serde_headers(&record), WeatherRecord::HEADERS);
    }

    #[test]
    fn test_clean_and_seed_headers_match_fields() {
        let clean = CleanAttraction {
            location_id: Some("3".to_string()),
            name: "Sagrada Familia".to_string(),
            category: "church".to_string(),
            rating: 4.8,
            lat: 41.4,
            lon: 2.17,
            source: "Google Places New".to_string(),
        };
        assert_eq!(serde_headers(&clean), CleanAttraction::HEADERS);

        let seed = SeedLocation {
            name: "Tokyo".to_string(),
            country: Some("Japan".to_string()),
            lat: Some(35.6897),
            lon: Some(139.6922),
            tz: "UTC".to_string(),
        };
        assert_eq!(serde_headers(&seed), SeedLocation::HEADERS);
    }

    #[test]
    fn test_popularity_date_serializes_as_iso_day() {
        let record = PopularityRecord {
            pop_id: 1,
            attraction_id: 1,
            on_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            hour: 0,
            busyness_index: 12,
        };
        assert_eq!(serde_headers(&record), PopularityRecord::HEADERS);

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.contains("1,1,2025-04-01,0,12"));
    }
}
