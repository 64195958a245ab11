//! Delimited-text input tables.
//!
//! The first row is always the header. Cells are matched to struct fields by
//! header name, so column order does not matter and extra columns are ignored.
//! Headers and cells are trimmed, and an empty cell deserializes to `None`
//! for optional fields.

use crate::error::AppError;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Field separator of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Rows of an input table together with its header names.
#[derive(Debug)]
pub struct InputTable<T> {
    pub headers: Vec<String>,
    pub rows: Vec<T>,
}

/// Read at most `limit` rows of `path` into `T`.
///
/// # Errors
///
/// Returns [`AppError::Input`] if the file cannot be opened or any row fails
/// to deserialize. A partially read table is never returned.
#[instrument(level = "info", skip_all, fields(path = %path.display(), ?delimiter, ?limit))]
pub fn read_table<T: DeserializeOwned>(
    path: &Path,
    delimiter: Delimiter,
    limit: Option<usize>,
) -> Result<InputTable<T>, AppError> {
    let input_err = |source: csv::Error| AppError::Input {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(input_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(input_err)?
        .iter()
        .map(str::to_string)
        .collect();
    debug!(?headers, "Read header row");

    let rows = reader
        .deserialize::<T>()
        .take(limit.unwrap_or(usize::MAX))
        .collect::<Result<Vec<T>, _>>()
        .map_err(input_err)?;

    info!(count = rows.len(), "Loaded input rows");
    Ok(InputTable { headers, rows })
}
