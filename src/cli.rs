//! Command-line interface definitions.
//!
//! One subcommand per table. Settings not given on the command line come
//! from the optional YAML config file, then from built-in defaults. The
//! Places API key is only ever taken from a flag or the environment.

use crate::inputs::Delimiter;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// smart_travel_data seed-cities -i worldcities.csv -o Location_clean_500.csv
///
/// GOOGLE_PLACES_API_KEY=... smart_travel_data attractions \
///     -i Location_dataset.csv -o attractions_google_v1.csv
///
/// smart_travel_data --config travel.yaml weather \
///     -i Location_dataset.csv -o WeatherDaily_linked.csv --start-date 2025-10-20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "SMART_TRAVEL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cut the seed location table from a world-city list
    SeedCities(SeedCitiesArgs),
    /// Collect tourist attractions for each location from the Places API
    Attractions(AttractionsArgs),
    /// Collect archived daily weather for each location from Open-Meteo
    Weather(WeatherArgs),
    /// Clean a collected attraction table
    CleanAttractions(TableArgs),
    /// Generate synthetic hourly popularity for the first attractions
    Popularity(PopularityArgs),
}

/// Input and output table paths.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Input table
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output table
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Options shared by commands that read a location table.
#[derive(Args, Debug)]
pub struct InputOptions {
    /// Field separator of the input table
    #[arg(long, value_enum)]
    pub delimiter: Option<Delimiter>,

    /// Process at most this many input rows
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Process every input row, ignoring any configured limit
    #[arg(long, conflicts_with = "limit")]
    pub no_limit: bool,
}

impl InputOptions {
    /// Row cap after applying the flags to `configured`.
    pub fn row_limit(&self, configured: Option<usize>) -> Option<usize> {
        if self.no_limit {
            None
        } else {
            self.limit.or(configured)
        }
    }
}

#[derive(Args, Debug)]
pub struct SeedCitiesArgs {
    #[command(flatten)]
    pub table: TableArgs,

    #[command(flatten)]
    pub input: InputOptions,
}

#[derive(Args, Debug)]
pub struct AttractionsArgs {
    #[command(flatten)]
    pub table: TableArgs,

    #[command(flatten)]
    pub input: InputOptions,

    /// Places API key
    #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Pause between requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct WeatherArgs {
    #[command(flatten)]
    pub table: TableArgs,

    #[command(flatten)]
    pub input: InputOptions,

    /// First day to fetch (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day to fetch (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Pause between requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct PopularityArgs {
    /// Output table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Day the records are dated, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Generate records for attraction ids 1..=N
    #[arg(long)]
    pub attractions: Option<u32>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attractions_parsing() {
        let cli = Cli::parse_from([
            "smart_travel_data",
            "attractions",
            "--input",
            "Location_dataset.csv",
            "--output",
            "attractions.csv",
            "--api-key",
            "abc",
            "-n",
            "50",
        ]);

        match cli.command {
            Command::Attractions(args) => {
                assert_eq!(args.table.input, PathBuf::from("Location_dataset.csv"));
                assert_eq!(args.table.output, PathBuf::from("attractions.csv"));
                assert_eq!(args.api_key, "abc");
                assert_eq!(args.input.row_limit(Some(500)), Some(50));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_weather_short_flags_and_dates() {
        let cli = Cli::parse_from([
            "smart_travel_data",
            "--config",
            "travel.yaml",
            "weather",
            "-i",
            "in.csv",
            "-o",
            "out.csv",
            "--delimiter",
            "comma",
            "--start-date",
            "2025-10-01",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("travel.yaml")));
        match cli.command {
            Command::Weather(args) => {
                assert_eq!(args.input.delimiter, Some(Delimiter::Comma));
                assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2025, 10, 1));
                assert_eq!(args.end_date, None);
                assert_eq!(args.input.row_limit(None), None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_limit_overrides_config() {
        let cli = Cli::parse_from([
            "smart_travel_data",
            "seed-cities",
            "-i",
            "worldcities.csv",
            "-o",
            "seed.csv",
            "--no-limit",
        ]);
        match cli.command {
            Command::SeedCities(args) => assert_eq!(args.input.row_limit(Some(500)), None),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_popularity_parsing() {
        let cli = Cli::parse_from([
            "smart_travel_data",
            "popularity",
            "-o",
            "pop.csv",
            "--attractions",
            "3",
            "--seed",
            "9",
        ]);
        match cli.command {
            Command::Popularity(args) => {
                assert_eq!(args.attractions, Some(3));
                assert_eq!(args.seed, Some(9));
                assert_eq!(args.date, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
