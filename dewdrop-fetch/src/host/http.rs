//! HTTP client with tracing and JSON decoding.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing
//! - A bounded per-request timeout
//! - JSON body decoding with malformed bodies reported as errors

use reqwest::{header, header::HeaderMap, header::HeaderValue, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// User agent string for DewDrop.
const USER_AGENT: &str = concat!("DewDrop/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// JSON Response
// ============================================================================

/// A successful response with a decoded body.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Decoded body; an empty body decodes to `Null`.
    pub body: Value,
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_send_error(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.timeout)
        } else {
            HttpError::Request(err)
        }
    }

    /// Performs a GET request and returns only the status code.
    ///
    /// The body is never read.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_status(&self, url: &Url, headers: HeaderMap) -> Result<u16, HttpError> {
        debug!("GET status request");

        let response = self
            .inner
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        debug!(status, "Response received");
        Ok(status)
    }

    /// Performs a GET request and decodes the JSON body.
    ///
    /// Non-2xx responses become `HttpError::Status`; bodies that are not
    /// JSON become `HttpError::MalformedBody`.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_json(&self, url: &Url, headers: HeaderMap) -> Result<JsonResponse, HttpError> {
        debug!("GET request");

        let response = self
            .inner
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        debug!(status = %status, "Response received");

        if !status.is_success() {
            return Err(HttpError::Status {
                code: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| HttpError::MalformedBody(e.to_string()))?
        };

        Ok(JsonResponse {
            status: status.as_u16(),
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
