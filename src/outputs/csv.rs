//! Delimited-text output for the collectors and transforms.
//!
//! Tables are written once, after every row has been processed. The header
//! row always comes from [`TableRecord::HEADERS`] so an empty run still
//! produces a well-formed file that downstream loaders can ingest.

use crate::error::AppError;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// A record that can be written as one row of an output table.
///
/// `HEADERS` must list the serialized field names in declaration order.
pub trait TableRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Write `records` to `path` as comma-delimited text with a header row.
///
/// # Errors
///
/// Returns [`AppError::Output`] when the file cannot be created or a record
/// cannot be serialized.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub fn write_table<T: TableRecord>(path: &Path, records: &[T]) -> Result<(), AppError> {
    let output_err = |source: csv::Error| AppError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(output_err)?;

    writer.write_record(T::HEADERS).map_err(output_err)?;
    for record in records {
        writer.serialize(record).map_err(output_err)?;
    }
    writer
        .flush()
        .map_err(|e| output_err(csv::Error::from(e)))?;

    info!("Wrote output table");
    Ok(())
}
