//! Output generation for the tables each command produces.
//!
//! # Submodules
//!
//! - [`csv`]: Writes typed records as delimited text with a header row
//!
//! # Output Files
//!
//! ```text
//! Location_clean_500.csv               # seed-cities
//! attractions_google_v1.csv            # attractions
//! WeatherDaily_linked.csv              # weather
//! attractions_cleaned.csv              # clean-attractions
//! attraction_popularity_15_oneday.csv  # popularity
//! ```

pub mod csv;
