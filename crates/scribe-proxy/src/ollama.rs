//! HTTP client for the Ollama runtime.
//!
//! Implements [`ChatCompletionPort`] for the writing services and exposes a
//! streaming call for the gateway's SSE path.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures_util::Stream;
use reqwest::Client;
use tracing::{debug, error};

use scribe_core::{ChatCompletionPort, ChatCompletionRequest, ChatCompletionResponse, CoreError};

use crate::config::ProxyConfig;
use crate::ollama_models::{OllamaChatRequest, OllamaChatResponse, OllamaTagsResponse};
use crate::stream::{ChunkIdentity, ndjson_to_sse};
use crate::translate::{completion_id, from_ollama_response, to_ollama_request};

/// Client for Ollama's native `/api/*` endpoints.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    /// Build a client from the gateway configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http,
            base_url: config.ollama_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a chat request and fail on anything but a 2xx status.
    async fn post_chat(&self, body: &OllamaChatRequest) -> Result<reqwest::Response, CoreError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(upstream = %url, model = %body.model, stream = body.stream, "Forwarding to Ollama");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to connect to Ollama: {e}");
                CoreError::UpstreamUnavailable(e.to_string())
            })?;

        ensure_success(response).await
    }

    /// Start a streaming completion and return its SSE frames.
    ///
    /// Upstream HTTP errors are reported here, before any frame exists.
    pub async fn stream_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static, CoreError> {
        let response = self.post_chat(&to_ollama_request(request, true)).await?;

        let identity = ChunkIdentity {
            id: completion_id(),
            created: Utc::now().timestamp(),
            model: request.model.clone(),
        };
        Ok(ndjson_to_sse(response.bytes_stream(), identity))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = %status, "Ollama rejected the request");
    Err(CoreError::UpstreamRejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatCompletionPort for OllamaClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CoreError> {
        let response = self.post_chat(&to_ollama_request(request, false)).await?;

        let upstream: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("Invalid Ollama response: {e}")))?;

        Ok(from_ollama_response(request, upstream))
    }

    async fn list_models(&self) -> Result<Vec<String>, CoreError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::UpstreamUnavailable(e.to_string()))?;

        let tags: OllamaTagsResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("Invalid Ollama tags response: {e}")))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
