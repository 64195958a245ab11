//! Whole-table cleaning of the collected attractions.
//!
//! Applied to the persisted attraction table after collection:
//!
//! 1. Only the attraction schema columns are kept; the legacy `price_level`
//!    is expected and dropped quietly, any other extra column is reported
//! 2. Rows without a name, latitude or longitude are discarded
//! 3. Free text is transliterated to ASCII and trimmed
//! 4. Blank category and source become `"unknown"`
//! 5. Ratings are coerced to numbers, anything unparseable becomes `0.0`
//!
//! The rating default here is deliberate and differs from collection time,
//! where an absent rating stays empty. Cleaning an already cleaned table
//! changes nothing.

use crate::models::{CleanAttraction, RawAttraction};
use crate::outputs::csv::TableRecord;
use deunicode::deunicode;
use tracing::{debug, info, instrument, warn};

/// Columns that older collector versions wrote and the cleaned table omits.
pub const LEGACY_COLUMNS: &[&str] = &["price_level"];

/// Fill value for blank category and source labels.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Result of cleaning a table.
#[derive(Debug)]
pub struct CleanReport {
    pub rows: Vec<CleanAttraction>,
    /// Rows discarded for lacking a name or coordinates.
    pub dropped: usize,
}

/// Log every input column the cleaned table omits and return their names.
///
/// Legacy columns are logged at info level; anything else is unexpected
/// and logged as a warning.
pub fn dropped_columns(headers: &[String]) -> Vec<&str> {
    let dropped: Vec<&str> = headers
        .iter()
        .map(String::as_str)
        .filter(|h| !CleanAttraction::HEADERS.contains(h))
        .collect();
    for column in &dropped {
        if LEGACY_COLUMNS.contains(column) {
            info!(column, "Dropping legacy column");
        } else {
            warn!(column, "Dropping column not in the attraction schema");
        }
    }
    dropped
}

/// Transliterate to ASCII and trim surrounding whitespace.
pub fn normalize_text(s: &str) -> String {
    deunicode(s.trim()).trim().to_string()
}

/// Coerce a raw rating cell; absent, blank and non-numeric cells give `0.0`.
///
/// ```ignore
/// assert_eq!(coerce_rating(Some("4.5")), 4.5);
/// assert_eq!(coerce_rating(Some("N/A")), 0.0);
/// assert_eq!(coerce_rating(None), 0.0);
/// ```
pub fn coerce_rating(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn label_or_unknown(raw: Option<&str>) -> String {
    let label = raw.map(normalize_text).unwrap_or_default();
    if label.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        label
    }
}

/// Clean one row, or `None` if it lacks a name or coordinates.
pub fn clean_row(raw: &RawAttraction) -> Option<CleanAttraction> {
    let name = raw
        .name
        .as_deref()
        .map(normalize_text)
        .filter(|n| !n.is_empty())?;
    let lat = parse_coordinate(raw.lat.as_deref())?;
    let lon = parse_coordinate(raw.lon.as_deref())?;

    Some(CleanAttraction {
        location_id: raw
            .location_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        name,
        category: label_or_unknown(raw.category.as_deref()),
        rating: coerce_rating(raw.rating.as_deref()),
        lat,
        lon,
        source: label_or_unknown(raw.source.as_deref()),
    })
}

/// Clean a whole table, keeping the surviving rows in input order.
#[instrument(level = "info", skip_all, fields(rows = rows.len()))]
pub fn clean_attractions(rows: &[RawAttraction]) -> CleanReport {
    let mut cleaned = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for (index, raw) in rows.iter().enumerate() {
        match clean_row(raw) {
            Some(row) => cleaned.push(row),
            None => {
                dropped += 1;
                debug!(index, name = ?raw.name, "Dropping row without name or coordinates");
            }
        }
    }

    info!(kept = cleaned.len(), dropped, "Cleaned attraction table");
    CleanReport {
        rows: cleaned,
        dropped,
    }
}
