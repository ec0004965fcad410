//! Access to the gateway's own HTTP API.
//!
//! The `health_check` and `list_models` tools and the MCP resources read
//! the running gateway over HTTP rather than calling the services directly,
//! so they report what an HTTP client would see.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use scribe_core::CoreError;

/// Default base URL of the scribe HTTP API.
pub const DEFAULT_API_URL: &str = "http://localhost:4891";

/// Read-only JSON access to the scribe HTTP API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// GET `path` (relative to the API base URL, starting with `/`) and
    /// decode the JSON body.
    async fn get_json(&self, path: &str) -> Result<Value, CoreError>;
}

/// [`ApiGateway`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpApiGateway {
    http: Client,
    base_url: String,
}

impl HttpApiGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let base_url: String = base_url.into();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn get_json(&self, path: &str) -> Result<Value, CoreError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Reading API");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::UpstreamRejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("Invalid API response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let gateway = HttpApiGateway::new("http://localhost:4891/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.base_url(), DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_upstream_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpApiGateway::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = gateway.get_json("/health").await.unwrap_err();
        assert!(matches!(err, CoreError::UpstreamUnavailable(_)));
    }
}
