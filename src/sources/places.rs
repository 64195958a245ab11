//! Tourist attractions via the Places text-search API.
//!
//! One `POST` per location with the body
//! `{"textQuery": "Tourist attractions in {name}, {country}", "pageSize": N}`.
//! The API key travels in the `X-Goog-Api-Key` header and the returned
//! fields are limited by `X-Goog-FieldMask`.
//!
//! # Category
//!
//! Places carry a list of types; only the first one is kept as the
//! attraction's category. Later types are discarded.

use crate::api::ApiRequest;
use crate::config::PlacesConfig;
use crate::error::FetchError;
use crate::models::{AttractionRecord, LocationRow};
use crate::pipeline::Source;
use serde_json::{Value, json};
use std::fmt;

const PAYLOAD_FIELD: &str = "places";

/// Attraction search source. Holds the API key; never printed.
pub struct PlacesSource {
    endpoint: String,
    api_key: String,
    field_mask: String,
    page_size: u32,
    source_label: String,
}

impl PlacesSource {
    pub fn new(config: &PlacesConfig, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            field_mask: config.field_mask.clone(),
            page_size: config.page_size,
            source_label: config.source_label.clone(),
        }
    }
}

impl fmt::Debug for PlacesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesSource")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("field_mask", &self.field_mask)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Free-text query for a location.
///
/// Absent or blank name and country parts are left out; with neither
/// present the query is just `Tourist attractions`.
pub fn search_query(row: &LocationRow) -> String {
    let parts: Vec<&str> = [row.name.as_deref(), row.country.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        "Tourist attractions".to_string()
    } else {
        format!("Tourist attractions in {}", parts.join(", "))
    }
}

impl Source for PlacesSource {
    type Row = LocationRow;
    type Record = AttractionRecord;

    fn name(&self) -> &'static str {
        "places"
    }

    fn row_key(&self, row: &LocationRow) -> i64 {
        row.location_id
    }

    fn build_request(&self, row: &LocationRow) -> ApiRequest {
        let body = json!({
            "textQuery": search_query(row),
            "pageSize": self.page_size,
        });
        ApiRequest::post_json(&self.endpoint, body)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", &self.field_mask)
    }

    fn extract_records(
        &self,
        response: &Value,
        row: &LocationRow,
    ) -> Result<Vec<AttractionRecord>, FetchError> {
        let places = response
            .get(PAYLOAD_FIELD)
            .and_then(Value::as_array)
            .ok_or(FetchError::missing(PAYLOAD_FIELD))?;

        Ok(places
            .iter()
            .map(|place| AttractionRecord {
                location_id: row.location_id,
                name: place
                    .pointer("/displayName/text")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                category: place
                    .get("types")
                    .and_then(Value::as_array)
                    .and_then(|types| types.first())
                    .and_then(Value::as_str)
                    .map(str::to_string),
                rating: place.get("rating").and_then(Value::as_f64),
                lat: place.pointer("/location/latitude").and_then(Value::as_f64),
                lon: place.pointer("/location/longitude").and_then(Value::as_f64),
                source: self.source_label.clone(),
            })
            .collect())
    }
}
