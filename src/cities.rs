//! Seed location table cut from a world-city list.

use crate::models::{SeedLocation, WorldCity};
use tracing::{info, instrument};

/// Rename the world-city columns to the location schema and stamp every
/// row with `timezone`.
///
/// `city` becomes `name` and `lng` becomes `lon`; rows keep their input order.
/// The source list carries no timezone, so a single default label is used.
#[instrument(level = "info", skip_all, fields(rows = cities.len(), %timezone))]
pub fn seed_locations(cities: &[WorldCity], timezone: &str) -> Vec<SeedLocation> {
    let seeds: Vec<SeedLocation> = cities
        .iter()
        .map(|c| SeedLocation {
            name: c.city.clone(),
            country: c.country.clone(),
            lat: c.lat,
            lon: c.lng,
            tz: timezone.to_string(),
        })
        .collect();
    info!(count = seeds.len(), "Prepared seed locations");
    seeds
}
