//! Daily weather via the Open-Meteo historical archive.
//!
//! One `GET` per location:
//!
//! ```text
//! {endpoint}?latitude={lat}&longitude={lon}&start_date={start}&end_date={end}
//!     &daily=temperature_2m_min,temperature_2m_max,precipitation_sum,weathercode
//!     &timezone={tz}
//! ```
//!
//! The `daily` payload holds parallel arrays indexed by day offset. Each
//! offset becomes one [`WeatherRecord`], with the WMO weather code
//! translated by [`weather_code_label`].

use crate::api::ApiRequest;
use crate::config::WeatherConfig;
use crate::error::FetchError;
use crate::models::{LocationRow, WeatherRecord};
use crate::pipeline::Source;
use chrono::NaiveDate;
use serde_json::Value;

const PAYLOAD_FIELD: &str = "daily";
const DAILY_VARIABLES: &str = "temperature_2m_min,temperature_2m_max,precipitation_sum,weathercode";

/// Label for codes outside the table, and for absent codes.
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Translate a WMO weather code to a condition label.
#[must_use]
pub fn weather_code_label(code: i64) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Cloudy",
        45 => "Fog",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        71 | 73 => "Snow fall",
        80 | 81 => "Rain showers",
        95 => "Thunderstorm",
        _ => UNKNOWN_CONDITION,
    }
}

/// Archived daily weather source.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    endpoint: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    default_timezone: String,
    source_label: String,
}

impl ArchiveSource {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            start_date: config.start_date,
            end_date: config.end_date,
            default_timezone: config.default_timezone.clone(),
            source_label: config.source_label.clone(),
        }
    }

    /// Timezone for `row`, or the default when the cell is absent or blank.
    fn timezone<'a>(&'a self, row: &'a LocationRow) -> &'a str {
        row.tz
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .unwrap_or(self.default_timezone.as_str())
    }
}

/// Render an optional coordinate; absent coordinates become an empty value
/// which the API rejects, skipping the row.
fn coordinate(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// `i`-th element of the named daily array as a float.
fn daily_f64(daily: &Value, field: &str, i: usize) -> Option<f64> {
    daily.get(field)?.get(i)?.as_f64()
}

fn daily_code(daily: &Value, i: usize) -> Option<i64> {
    let v = daily.get("weathercode")?.get(i)?;
    v.as_i64()
        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

impl Source for ArchiveSource {
    type Row = LocationRow;
    type Record = WeatherRecord;

    fn name(&self) -> &'static str {
        "open-meteo"
    }

    fn row_key(&self, row: &LocationRow) -> i64 {
        row.location_id
    }

    fn build_request(&self, row: &LocationRow) -> ApiRequest {
        let url = format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&daily={}&timezone={}",
            self.endpoint,
            coordinate(row.lat),
            coordinate(row.lon),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            DAILY_VARIABLES,
            urlencoding::encode(self.timezone(row)),
        );
        ApiRequest::get(url)
    }

    fn extract_records(
        &self,
        response: &Value,
        row: &LocationRow,
    ) -> Result<Vec<WeatherRecord>, FetchError> {
        let daily = response
            .get(PAYLOAD_FIELD)
            .filter(|d| d.is_object())
            .ok_or(FetchError::missing(PAYLOAD_FIELD))?;
        let days = daily
            .get("time")
            .and_then(Value::as_array)
            .ok_or(FetchError::missing("daily.time"))?;

        Ok(days
            .iter()
            .enumerate()
            .map(|(i, day)| WeatherRecord {
                location_id: row.location_id,
                on_date: day.as_str().map(str::to_string).unwrap_or_default(),
                min_temp_c: daily_f64(daily, "temperature_2m_min", i),
                max_temp_c: daily_f64(daily, "temperature_2m_max", i),
                precip_mm: daily_f64(daily, "precipitation_sum", i),
                conditions: daily_code(daily, i)
                    .map(weather_code_label)
                    .unwrap_or(UNKNOWN_CONDITION)
                    .to_string(),
                source: self.source_label.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpFetcher;
    use crate::pipeline::{FixedDelay, run};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row(location_id: i64, lat: Option<f64>, lon: Option<f64>, tz: Option<&str>) -> LocationRow {
        LocationRow {
            location_id,
            name: None,
            country: None,
            lat,
            lon,
            tz: tz.map(str::to_string),
        }
    }

    fn source() -> ArchiveSource {
        ArchiveSource::new(&WeatherConfig::default())
    }

    #[test]
    fn test_weather_code_labels() {
        assert_eq!(weather_code_label(0), "Clear");
        assert_eq!(weather_code_label(3), "Cloudy");
        assert_eq!(weather_code_label(73), "Snow fall");
        assert_eq!(weather_code_label(81), "Rain showers");
        assert_eq!(weather_code_label(95), "Thunderstorm");
        assert_eq!(weather_code_label(999), "Unknown");
        assert_eq!(weather_code_label(-1), "Unknown");
    }

    #[test]
    fn test_build_request_with_timezone() {
        let request = source().build_request(&row(
            5,
            Some(40.6943),
            Some(-73.9249),
            Some("America/New_York"),
        ));
        assert_eq!(
            request.url,
            "https://archive-api.open-meteo.com/v1/archive?latitude=40.6943&longitude=-73.9249\
             &start_date=2025-10-20&end_date=2025-10-26\
             &daily=temperature_2m_min,temperature_2m_max,precipitation_sum,weathercode\
             &timezone=America%2FNew_York"
        );
    }

    #[test]
    fn test_build_request_defaults_missing_timezone() {
        let missing = source().build_request(&row(5, Some(1.0), Some(2.0), None));
        let blank = source().build_request(&row(5, Some(1.0), Some(2.0), Some("  ")));
        assert!(missing.url.ends_with("&timezone=UTC"));
        assert!(blank.url.ends_with("&timezone=UTC"));
    }

    #[test]
    fn test_extract_daily_arrays() {
        let response = json!({
            "latitude": 35.7,
            "daily": {
                "time": ["2025-10-20", "2025-10-21", "2025-10-22"],
                "temperature_2m_min": [14.2, null, 12.0],
                "temperature_2m_max": [21.5, 19.0, 18.1],
                "precipitation_sum": [0.0, 3.4, 12.8],
                "weathercode": [0, 61, 999]
            }
        });

        let records = source()
            .extract_records(&response, &row(12, Some(35.7), Some(139.7), None))
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            WeatherRecord {
                location_id: 12,
                on_date: "2025-10-20".to_string(),
                min_temp_c: Some(14.2),
                max_temp_c: Some(21.5),
                precip_mm: Some(0.0),
                conditions: "Clear".to_string(),
                source: "Open-Meteo".to_string(),
            }
        );
        assert_eq!(records[1].min_temp_c, None);
        assert_eq!(records[1].conditions, "Light rain");
        assert_eq!(records[2].conditions, "Unknown");
    }

    #[test]
    fn test_extract_short_or_missing_arrays_are_null() {
        let response = json!({
            "daily": {
                "time": ["2025-10-20", "2025-10-21"],
                "temperature_2m_min": [5.0],
                "weathercode": [3.0, "x"]
            }
        });

        let records = source()
            .extract_records(&response, &row(1, None, None, None))
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].min_temp_c, Some(5.0));
        assert_eq!(records[0].conditions, "Cloudy");
        assert_eq!(records[1].min_temp_c, None);
        assert_eq!(records[1].max_temp_c, None);
        assert_eq!(records[1].precip_mm, None);
        assert_eq!(records[1].conditions, "Unknown");
    }

    #[test]
    fn test_extract_missing_payload() {
        let err = source()
            .extract_records(&json!({"error": true, "reason": "bad"}), &row(1, None, None, None))
            .unwrap_err();
        assert_eq!(err, FetchError::missing("daily"));

        let err = source()
            .extract_records(&json!({"daily": {}}), &row(1, None, None, None))
            .unwrap_err();
        assert_eq!(err, FetchError::missing("daily.time"));

        let empty = source()
            .extract_records(&json!({"daily": {"time": []}}), &row(1, None, None, None))
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_against_mock_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("latitude", "48.8566"))
            .and(query_param("timezone", "Europe/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "daily": {
                    "time": ["2025-10-20", "2025-10-21"],
                    "temperature_2m_min": [8.1, 9.0],
                    "temperature_2m_max": [15.2, 16.4],
                    "precipitation_sum": [0.2, 0.0],
                    "weathercode": [2, 1]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("latitude", ""))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Parameter 'latitude' is invalid"
            })))
            .mount(&server)
            .await;

        let config = WeatherConfig {
            endpoint: format!("{}/v1/archive", server.uri()),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 21).unwrap(),
            ..WeatherConfig::default()
        };
        let source = ArchiveSource::new(&config);
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let rows = vec![
            row(1, Some(48.8566), Some(2.3522), Some("Europe/Paris")),
            row(2, None, None, None),
        ];

        let out = run(&rows, &source, &fetcher, &FixedDelay::from_millis(0)).await;

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].conditions, "Partly cloudy");
        assert_eq!(out.records[1].conditions, "Mainly clear");
        assert_eq!(out.stats.with_records, 1);
        assert_eq!(out.stats.failed, 1);
    }
}
