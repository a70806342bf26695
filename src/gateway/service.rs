use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;
use crate::upstream::Resource;

#[derive(Error, Debug)]
pub enum RelayFailure {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
#[error("{failure}")]
pub struct GatewayError {
    pub resource: Resource,
    #[source]
    pub failure: RelayFailure,
}

impl HttpError for GatewayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn message(&self) -> &'static str {
        match self.resource {
            Resource::Realtime => "Failed to fetch realtime weather data",
            Resource::Forecast => "Failed to fetch forecast data",
        }
    }
}

impl_into_response!(GatewayError);

/// Stateless relay to the upstream weather API.
///
/// The upstream body is returned as parsed JSON without reshaping. There is
/// no retry: a single failed attempt is reported to the caller.
pub struct ProxyService {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ProxyService {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub async fn relay(&self, resource: Resource, city: &str) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, resource.upstream_path());
        let fail = |failure| GatewayError { resource, failure };

        tracing::debug!(resource = %resource, city = %city, url = %url, "Relaying request upstream");

        // Covers connect, headers and body so a stalled stream cannot hang the handler
        let body = tokio::time::timeout(self.timeout, self.fetch_body(&url, city))
            .await
            .map_err(|_| fail(RelayFailure::Timeout(self.timeout)))?
            .map_err(|e| fail(self.classify(e)))?;

        let data: Value =
            serde_json::from_slice(&body).map_err(|e| fail(RelayFailure::InvalidJson(e)))?;

        tracing::info!(resource = %resource, city = %city, "Relayed upstream response");

        Ok(data)
    }

    /// The shared client's own deadline can fire on the same tick as ours
    fn classify(&self, e: reqwest::Error) -> RelayFailure {
        if e.is_timeout() {
            RelayFailure::Timeout(self.timeout)
        } else {
            RelayFailure::Request(e)
        }
    }

    async fn fetch_body(&self, url: &str, city: &str) -> Result<Vec<u8>, reqwest::Error> {
        // Use query builder for proper URL encoding of non-ASCII city names
        let response = self.client.get(url).query(&[("query", city)]).send().await?;

        tracing::debug!(status = %response.status(), "Received upstream response");

        Ok(response.bytes().await?.to_vec())
    }
}
