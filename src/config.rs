//! Run configuration.
//!
//! Every setting has a default matching the published SmartTravel tables,
//! so the YAML file is optional and may name only the fields it changes:
//!
//! ```yaml
//! request_timeout_secs: 20
//! places:
//!   delay_ms: 1000
//!   row_limit: 500
//! weather:
//!   start_date: 2025-10-20
//!   end_date: 2025-10-26
//! ```
//!
//! Command-line flags are applied on top of the file, then [`Config::validate`]
//! runs once before any input is read.

use crate::error::AppError;
use crate::inputs::Delimiter;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Top-level configuration, one section per command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Upper bound for a single HTTP request, connect to last byte.
    pub request_timeout_secs: u64,
    pub seed: SeedConfig,
    pub places: PlacesConfig,
    pub weather: WeatherConfig,
    pub popularity: PopularityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    pub delimiter: Delimiter,
    pub row_limit: Option<usize>,
    pub default_timezone: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesConfig {
    pub endpoint: String,
    pub field_mask: String,
    pub page_size: u32,
    pub source_label: String,
    pub delimiter: Delimiter,
    pub row_limit: Option<usize>,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    pub endpoint: String,
    /// First archived day, inclusive.
    pub start_date: NaiveDate,
    /// Last archived day, inclusive.
    pub end_date: NaiveDate,
    pub default_timezone: String,
    pub source_label: String,
    pub delimiter: Delimiter,
    pub row_limit: Option<usize>,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopularityConfig {
    pub on_date: NaiveDate,
    pub attraction_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 20,
            seed: SeedConfig::default(),
            places: PlacesConfig::default(),
            weather: WeatherConfig::default(),
            popularity: PopularityConfig::default(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            row_limit: Some(500),
            default_timezone: "UTC".to_string(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://places.googleapis.com/v1/places:searchText".to_string(),
            field_mask: "places.displayName,places.formattedAddress,places.rating,\
                         places.priceLevel,places.types,places.location"
                .to_string(),
            page_size: 10,
            source_label: "Google Places New".to_string(),
            delimiter: Delimiter::Semicolon,
            row_limit: Some(500),
            delay_ms: 1000,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 10, 20).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 26).unwrap_or_default(),
            default_timezone: "UTC".to_string(),
            source_label: "Open-Meteo".to_string(),
            delimiter: Delimiter::Semicolon,
            row_limit: None,
            delay_ms: 0,
        }
    }
}

impl Default for PopularityConfig {
    fn default() -> Self {
        Self {
            on_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default(),
            attraction_count: 15,
        }
    }
}

impl Config {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    #[instrument(level = "info", skip_all, fields(path = ?path.map(Path::display)))]
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&text)?;
        info!("Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, AppError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| AppError::config(e.to_string()))
    }

    /// Reject settings that would make every row fail or the run meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("request_timeout_secs must be positive"));
        }
        for (name, endpoint) in [
            ("places.endpoint", &self.places.endpoint),
            ("weather.endpoint", &self.weather.endpoint),
        ] {
            Url::parse(endpoint)
                .map_err(|e| AppError::config(format!("{name} `{endpoint}` is not a URL: {e}")))?;
        }
        if self.places.page_size == 0 {
            return Err(AppError::config("places.page_size must be positive"));
        }
        if self.weather.start_date > self.weather.end_date {
            return Err(AppError::config(format!(
                "weather.start_date {} is after weather.end_date {}",
                self.weather.start_date, self.weather.end_date
            )));
        }
        if self.popularity.attraction_count == 0 {
            return Err(AppError::config("popularity.attraction_count must be positive"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
