//! HTTP interaction with the attraction and weather APIs.
//!
//! # Architecture
//!
//! - [`ApiRequest`]: A fully built request (method, URL, headers, JSON body)
//! - [`FetchAsync`]: Core trait performing one request and returning the JSON body
//! - [`HttpFetcher`]: [`FetchAsync`] over a shared `reqwest` client with a
//!   per-request timeout
//!
//! There is no retry here. A failed call is reported once as a
//! [`FetchError`] and the pipeline moves on to the next row.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Length of the body preview kept in status errors.
const ERROR_BODY_PREVIEW: usize = 200;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request derived from one input row.
///
/// Header values may carry credentials, so the `Debug` and `Display`
/// renderings only show header names.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header called `name` (case-insensitive).
    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("body", &self.body)
            .finish()
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.method {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        write!(f, "{} {}", method, self.url)
    }
}

/// Trait for performing one API request.
///
/// Implementors return the parsed JSON body of a successful response. The
/// pipeline is generic over this trait so tests can answer requests without
/// a network.
pub trait FetchAsync {
    /// Send `request` and return its JSON body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] when no response arrived (including timeout)
    /// - [`FetchError::Status`] for a non-success status code
    /// - [`FetchError::Body`] when the body is empty or not JSON
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError>;
}

/// [`FetchAsync`] implementation over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(request = %request))]
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let t0 = Instant::now();

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u64,
                "API call returned an error status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_for_log(text.trim(), ERROR_BODY_PREVIEW),
            });
        }

        if text.trim().is_empty() {
            return Err(FetchError::Body("empty response body".to_string()));
        }

        let value = serde_json::from_str::<Value>(&text).map_err(|e| {
            FetchError::Body(format!(
                "{} (body: {})",
                e,
                truncate_for_log(&text, ERROR_BODY_PREVIEW)
            ))
        })?;

        debug!(
            elapsed_ms = dt.as_millis() as u64,
            bytes = text.len(),
            "API call succeeded"
        );
        Ok(value)
    }
}
