//! Error types for the collectors and table transforms.
//!
//! Two layers exist and must stay separate:
//!
//! - [`FetchError`] describes why a single input row produced no records. It is
//!   produced by the transport or by a source's extractor and is always
//!   consumed by the pipeline driver; it never aborts a run.
//! - [`AppError`] is fatal. Input that cannot be read, output that cannot be
//!   written, or a broken configuration stops the command before any partial
//!   table is produced.

use std::path::PathBuf;
use thiserror::Error;

/// Why one row of a fetch pipeline yielded zero records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout and friends.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was empty or not JSON.
    #[error("malformed response body: {0}")]
    Body(String),

    /// The body parsed but the expected top-level payload is absent.
    #[error("response has no `{field}` payload")]
    MissingPayload { field: &'static str },
}

impl FetchError {
    /// Create a missing-payload error for the named response field
    pub fn missing(field: &'static str) -> Self {
        Self::MissingPayload { field }
    }

    /// `true` when the fault came from the response shape rather than the wire.
    pub fn is_missing_payload(&self) -> bool {
        matches!(self, Self::MissingPayload { .. })
    }
}

/// Fatal errors that end a command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read input table {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write output table {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("output location {path} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
