//! # SmartTravel data collection
//!
//! Builds the tables behind the SmartTravel planner: seed locations,
//! tourist attractions, archived daily weather and synthetic popularity.
//!
//! ## Usage
//!
//! ```sh
//! smart_travel_data seed-cities -i worldcities.csv -o Location_clean_500.csv
//! smart_travel_data attractions -i Location_dataset.csv -o attractions_google_v1.csv
//! smart_travel_data clean-attractions -i attractions_google_v1.csv -o attractions_cleaned.csv
//! smart_travel_data weather -i Location_dataset.csv -o WeatherDaily_linked.csv
//! smart_travel_data popularity -o attraction_popularity_15_oneday.csv
//! ```
//!
//! ## Architecture
//!
//! The two collectors share one pipeline:
//! 1. **Load**: Read the whole location table (fatal on failure)
//! 2. **Fetch**: One request per row, strictly in order, with a fixed pause
//! 3. **Extract**: Flatten each response into records; failed rows give none
//! 4. **Write**: Persist the accumulated table once, header first
//!
//! The remaining commands are local table transforms.

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cities;
mod cleaning;
mod cli;
mod config;
mod error;
mod inputs;
mod models;
mod outputs;
mod pipeline;
mod popularity;
mod sources;
mod utils;

use api::HttpFetcher;
use cli::{AttractionsArgs, Cli, Command, PopularityArgs, SeedCitiesArgs, TableArgs, WeatherArgs};
use config::Config;
use error::AppError;
use inputs::{Delimiter, read_table};
use models::{LocationRow, RawAttraction, WorldCity};
use outputs::csv::write_table;
use pipeline::FixedDelay;
use sources::open_meteo::ArchiveSource;
use sources::places::PlacesSource;
use utils::{ensure_writable_output, format_duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    let args = Cli::parse();
    debug!(config = ?args.config, "Parsed CLI arguments");

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let result = match args.command {
        Command::SeedCities(cmd) => seed_cities(config, cmd),
        Command::Attractions(cmd) => attractions(config, cmd).await,
        Command::Weather(cmd) => weather(config, cmd).await,
        Command::CleanAttractions(cmd) => clean_attractions(cmd),
        Command::Popularity(cmd) => popularity(config, cmd),
    };

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    let elapsed = start_time.elapsed();
    info!(elapsed = %format_duration(elapsed), "Execution complete");

    result.map_err(Into::into)
}

/// Validate the final configuration and the output location, in that order.
fn prepare(config: &Config, output: &std::path::Path) -> Result<(), AppError> {
    config.validate()?;
    ensure_writable_output(output)?;
    Ok(())
}

#[instrument(level = "info", skip_all)]
fn seed_cities(mut config: Config, cmd: SeedCitiesArgs) -> Result<(), AppError> {
    if let Some(delimiter) = cmd.input.delimiter {
        config.seed.delimiter = delimiter;
    }
    let limit = cmd.input.row_limit(config.seed.row_limit);
    prepare(&config, &cmd.table.output)?;

    let table = read_table::<WorldCity>(&cmd.table.input, config.seed.delimiter, limit)?;
    let seeds = cities::seed_locations(&table.rows, &config.seed.default_timezone);
    write_table(&cmd.table.output, &seeds)?;

    info!(
        count = seeds.len(),
        path = %cmd.table.output.display(),
        "Saved seed locations"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn attractions(mut config: Config, cmd: AttractionsArgs) -> Result<(), AppError> {
    if let Some(delimiter) = cmd.input.delimiter {
        config.places.delimiter = delimiter;
    }
    if let Some(delay_ms) = cmd.delay_ms {
        config.places.delay_ms = delay_ms;
    }
    if cmd.api_key.trim().is_empty() {
        return Err(AppError::config("the Places API key is empty"));
    }
    let limit = cmd.input.row_limit(config.places.row_limit);
    prepare(&config, &cmd.table.output)?;

    let table = read_table::<LocationRow>(&cmd.table.input, config.places.delimiter, limit)?;
    let source = PlacesSource::new(&config.places, cmd.api_key.trim());
    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let throttle = FixedDelay::from_millis(config.places.delay_ms);
    info!(rows = table.rows.len(), ?source, "Collecting attractions");

    let out = pipeline::run(&table.rows, &source, &fetcher, &throttle).await;
    write_table(&cmd.table.output, &out.records)?;

    info!(
        count = out.records.len(),
        skipped = out.stats.skipped(),
        locations = out.stats.rows,
        path = %cmd.table.output.display(),
        "Done! Saved places"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn weather(mut config: Config, cmd: WeatherArgs) -> Result<(), AppError> {
    if let Some(delimiter) = cmd.input.delimiter {
        config.weather.delimiter = delimiter;
    }
    if let Some(start) = cmd.start_date {
        config.weather.start_date = start;
    }
    if let Some(end) = cmd.end_date {
        config.weather.end_date = end;
    }
    if let Some(delay_ms) = cmd.delay_ms {
        config.weather.delay_ms = delay_ms;
    }
    let limit = cmd.input.row_limit(config.weather.row_limit);
    prepare(&config, &cmd.table.output)?;

    let table = read_table::<LocationRow>(&cmd.table.input, config.weather.delimiter, limit)?;
    let source = ArchiveSource::new(&config.weather);
    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let throttle = FixedDelay::new(Duration::from_millis(config.weather.delay_ms));
    info!(
        rows = table.rows.len(),
        start = %config.weather.start_date,
        end = %config.weather.end_date,
        "Fetching weather data from Open-Meteo"
    );

    let out = pipeline::run(&table.rows, &source, &fetcher, &throttle).await;
    write_table(&cmd.table.output, &out.records)?;

    info!(
        count = out.records.len(),
        locations = out.stats.with_records,
        path = %cmd.table.output.display(),
        "Done! Saved daily weather rows"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
fn clean_attractions(cmd: TableArgs) -> Result<(), AppError> {
    ensure_writable_output(&cmd.output)?;

    let table = read_table::<RawAttraction>(&cmd.input, Delimiter::Comma, None)?;
    cleaning::dropped_columns(&table.headers);
    let report = cleaning::clean_attractions(&table.rows);
    write_table(&cmd.output, &report.rows)?;

    info!(
        count = report.rows.len(),
        dropped = report.dropped,
        path = %cmd.output.display(),
        "Cleaned data saved"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
fn popularity(mut config: Config, cmd: PopularityArgs) -> Result<(), AppError> {
    if let Some(date) = cmd.date {
        config.popularity.on_date = date;
    }
    if let Some(count) = cmd.attractions {
        config.popularity.attraction_count = count;
    }
    prepare(&config, &cmd.output)?;

    let mut rng = match cmd.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let records = popularity::generate(
        1..=config.popularity.attraction_count,
        config.popularity.on_date,
        &mut rng,
    );
    write_table(&cmd.output, &records)?;

    info!(
        count = records.len(),
        path = %cmd.output.display(),
        "Saved popularity records"
    );
    Ok(())
}
