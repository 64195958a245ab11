//! API sources plugged into the fetch pipeline.
//!
//! Each source turns one location row into one request and flattens the
//! response into output records. Both follow the same rules:
//!
//! - Request building never fails; absent row fields fall back to defaults
//! - A missing top-level payload field is reported as
//!   [`FetchError::MissingPayload`](crate::error::FetchError::MissingPayload)
//! - Absent or wrongly typed values inside the payload become `None`, never `0`
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Payload field |
//! |--------|--------|--------|---------------|
//! | Places text search | [`places`] | `POST` + API key header | `places` |
//! | Open-Meteo archive | [`open_meteo`] | `GET` query string | `daily` |

pub mod open_meteo;
pub mod places;
