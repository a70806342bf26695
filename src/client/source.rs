use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::upstream::Resource;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Somewhere realtime and forecast JSON can be fetched from
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn fetch(&self, resource: Resource, city: &str) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The third-party API: `/v2/weather?query=`
    Upstream,
    /// Our own gateway: `/api/weather?city=`
    Proxy,
}

/// HTTP-backed source for either the upstream API or the gateway
pub struct HttpSource {
    client: Client,
    base_url: String,
    endpoint: Endpoint,
}

impl HttpSource {
    pub fn new(client: Client, base_url: &str, endpoint: Endpoint) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoint,
        }
    }

    pub fn upstream(client: Client, base_url: &str) -> Self {
        Self::new(client, base_url, Endpoint::Upstream)
    }

    pub fn proxy(client: Client, base_url: &str) -> Self {
        Self::new(client, base_url, Endpoint::Proxy)
    }

    fn request_parts(&self, resource: Resource) -> (String, &'static str) {
        match self.endpoint {
            Endpoint::Upstream => (
                format!("{}{}", self.base_url, resource.upstream_path()),
                "query",
            ),
            Endpoint::Proxy => (
                format!("{}{}", self.base_url, resource.proxy_path()),
                "city",
            ),
        }
    }
}

#[async_trait]
impl WeatherSource for HttpSource {
    fn name(&self) -> &'static str {
        match self.endpoint {
            Endpoint::Upstream => "upstream",
            Endpoint::Proxy => "proxy",
        }
    }

    async fn fetch(&self, resource: Resource, city: &str) -> Result<Value, FetchError> {
        let (url, param) = self.request_parts(resource);

        tracing::debug!(source = self.name(), resource = %resource, city = %city, "Fetching");

        let response = self.client.get(&url).query(&[(param, city)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upstream_uses_query_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/weather/forecast"))
            .and(query_param("query", "厦门"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpSource::upstream(Client::new(), &server.uri());
        let value = source.fetch(Resource::Forecast, "厦门").await.unwrap();
        assert_eq!(value["code"], 200);
    }

    #[tokio::test]
    async fn test_proxy_uses_city_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("city", "厦门"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpSource::proxy(Client::new(), &format!("{}/", server.uri()));
        assert!(source.fetch(Resource::Realtime, "厦门").await.is_ok());
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "code": 503 })))
            .mount(&server)
            .await;

        let source = HttpSource::upstream(Client::new(), &server.uri());
        let err = source.fetch(Resource::Realtime, "厦门").await.unwrap_err();
        assert!(matches!(err, FetchError::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_non_json_body_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let source = HttpSource::upstream(Client::new(), &server.uri());
        let err = source.fetch(Resource::Realtime, "厦门").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
