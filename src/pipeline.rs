//! Batch fetch-transform pipeline shared by the attraction and weather collectors.
//!
//! For every input row, in order:
//!
//! 1. [`Source::build_request`] turns the row into an [`ApiRequest`] (never fails)
//! 2. The [`FetchAsync`] implementation performs the call
//! 3. [`Source::extract_records`] flattens the response into zero or more records
//! 4. The [`Throttle`] waits before the next row
//!
//! Any [`FetchError`] in steps 2 or 3 costs that row its records and one
//! diagnostic line; the run always continues. Records are appended in row
//! order, then in response order within a row, and returned to the caller
//! together with per-outcome counts.

use crate::api::{ApiRequest, FetchAsync};
use crate::error::FetchError;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Per-source request builder and response extractor.
pub trait Source {
    type Row;
    type Record;

    /// Short name used in diagnostics, e.g. `"places"`.
    fn name(&self) -> &'static str;

    /// Identifying key of `row`, carried into every record it produces.
    fn row_key(&self, row: &Self::Row) -> i64;

    /// Build the request for `row`. Missing row fields are replaced by
    /// documented defaults rather than reported.
    fn build_request(&self, row: &Self::Row) -> ApiRequest;

    /// Flatten a response body into records for `row`.
    ///
    /// Returns [`FetchError::MissingPayload`] when the expected top-level
    /// field is absent. An empty payload is `Ok(vec![])`.
    fn extract_records(
        &self,
        response: &Value,
        row: &Self::Row,
    ) -> Result<Vec<Self::Record>, FetchError>;
}

/// Pause inserted after each processed row.
pub trait Throttle {
    async fn wait_between_requests(&self);
}

/// Constant courtesy delay, independent of previous outcomes.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Throttle for FixedDelay {
    async fn wait_between_requests(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Outcome counts of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows processed.
    pub rows: usize,
    /// Rows that produced at least one record.
    pub with_records: usize,
    /// Rows whose payload was present but empty.
    pub empty: usize,
    /// Rows whose response lacked the payload field.
    pub missing_payload: usize,
    /// Rows lost to transport, status or body faults.
    pub failed: usize,
}

impl RunStats {
    /// Rows that were skipped with a diagnostic.
    pub fn skipped(&self) -> usize {
        self.missing_payload + self.failed
    }
}

/// Records accumulated by a run plus its counts.
#[derive(Debug)]
pub struct PipelineOutput<R> {
    pub records: Vec<R>,
    pub stats: RunStats,
}

/// Run `source` over `rows` one request at a time.
///
/// An empty `rows` slice yields an empty output without touching the
/// fetcher or the throttle.
#[instrument(level = "info", skip_all, fields(source = source.name(), rows = rows.len()))]
pub async fn run<S, F, T>(
    rows: &[S::Row],
    source: &S,
    fetcher: &F,
    throttle: &T,
) -> PipelineOutput<S::Record>
where
    S: Source,
    F: FetchAsync,
    T: Throttle,
{
    let mut records = Vec::new();
    let mut stats = RunStats::default();

    let pb = progress_bar(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let key = source.row_key(row);
        let request = source.build_request(row);
        pb.set_message(format!("{} {}", source.name(), key));
        debug!(index, key, %request, "Fetching row");

        stats.rows += 1;
        match fetch_row(source, fetcher, &request, row).await {
            Ok(extracted) if extracted.is_empty() => {
                stats.empty += 1;
                info!(index, key, "Payload present but empty; no records for row");
            }
            Ok(extracted) => {
                stats.with_records += 1;
                debug!(index, key, count = extracted.len(), "Extracted records");
                records.extend(extracted);
            }
            Err(e) if e.is_missing_payload() => {
                stats.missing_payload += 1;
                warn!(index, key, error = %e, "No data in response; skipping row");
            }
            Err(e) => {
                stats.failed += 1;
                error!(index, key, %request, error = %e, "Request failed; skipping row");
            }
        }

        pb.inc(1);
        throttle.wait_between_requests().await;
    }

    pb.finish_and_clear();
    info!(
        rows = stats.rows,
        records = records.len(),
        with_records = stats.with_records,
        empty = stats.empty,
        missing_payload = stats.missing_payload,
        failed = stats.failed,
        "Pipeline finished"
    );

    PipelineOutput { records, stats }
}

/// Fetch and extract one row. Both fault classes surface as `Err`.
async fn fetch_row<S, F>(
    source: &S,
    fetcher: &F,
    request: &ApiRequest,
    row: &S::Row,
) -> Result<Vec<S::Record>, FetchError>
where
    S: Source,
    F: FetchAsync,
{
    let response = fetcher.fetch(request).await?;
    source.extract_records(&response, row)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta}) {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}
