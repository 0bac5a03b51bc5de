//! HTTP transport for BrandAlert API calls.
//!
//! One POST per call, no retries. Non-2xx statuses become typed errors;
//! successful bodies are returned as text without any parsing.

use crate::error::BrandAlertError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Production endpoint of the BrandAlert API.
pub const DEFAULT_BASE_URL: &str = "https://brand-alert.whoisxmlapi.com/api/v2";

/// HTTP client that posts payloads to the API endpoint.
#[derive(Debug, Clone)]
pub struct ApiRequester {
    /// HTTP client for making API requests
    http_client: reqwest::Client,
    /// Endpoint every request is posted to
    base_url: String,
    /// Whole-request deadline, `None` for no deadline
    timeout: Option<Duration>,
}

impl ApiRequester {
    /// Create a requester for `base_url` with an optional timeout.
    pub fn new<U: Into<String>>(
        base_url: U,
        timeout: Option<Duration>,
    ) -> Result<Self, BrandAlertError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url<U: Into<String>>(&mut self, base_url: U) {
        self.base_url = base_url.into();
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Change the timeout. The underlying HTTP client is rebuilt.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<(), BrandAlertError> {
        self.http_client = build_http_client(timeout)?;
        self.timeout = timeout;
        Ok(())
    }

    /// POST `payload` as JSON and return the response body.
    ///
    /// # Errors
    ///
    /// - `ApiAuth` for 401, 402 and 403
    /// - `BadRequest` for 400 and 422
    /// - `HttpApi` for any other status of 300 or above
    /// - `Network` / `Timeout` when the server cannot be reached
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<String, BrandAlertError> {
        debug!(url = %self.base_url, "sending BrandAlert request");

        let response = self
            .http_client
            .post(&self.base_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(url = %self.base_url, status, bytes = body.len(), "received BrandAlert response");

        match BrandAlertError::from_status(status, body.as_str()) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> BrandAlertError {
        if err.is_timeout() {
            BrandAlertError::Timeout {
                operation: format!("POST {}", self.base_url),
                duration: self.timeout,
            }
        } else {
            err.into()
        }
    }
}

fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client, BrandAlertError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        BrandAlertError::network_with_source("Failed to create HTTP client", e.to_string())
    })
}
