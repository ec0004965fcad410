//! Axum HTTP server for the OpenAI-compatible gateway.
//!
//! This module provides the router and the `serve()` function that runs it
//! on a pre-bound `TcpListener`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use scribe_core::{ChatCompletionPort, ChatCompletionRequest, DraftPostRequest, DraftService};

use crate::config::{CorsConfig, ProxyConfig};
use crate::error::HttpError;
use crate::models::ModelsResponse;
use crate::ollama::OllamaClient;
use crate::stream::sse_response;

/// Shared application state for the gateway.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client, used directly for streaming.
    ollama: OllamaClient,
    /// One-shot drafting service.
    drafts: Arc<DraftService>,
}

impl AppState {
    /// Build the state from a validated configuration.
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let ollama = OllamaClient::from_config(config)?;
        let port: Arc<dyn ChatCompletionPort> = Arc::new(ollama.clone());
        let drafts = DraftService::new(port).with_extension(config.draft_extension.clone());

        Ok(Self {
            ollama,
            drafts: Arc::new(drafts),
        })
    }
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build the gateway router.
pub fn create_router(state: AppState, config: &ProxyConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/v1/models", get(list_models))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/tool/draft_post", post(draft_post))
        .with_state(state);

    if let Some(dir) = &config.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(build_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway with a pre-bound listener.
///
/// Runs until the cancellation token is triggered.
pub async fn serve(
    listener: TcpListener,
    config: ProxyConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    config.validate()?;
    let addr = listener.local_addr()?;
    info!("Gateway starting on {addr}");

    let state = AppState::new(&config)?;
    let app = create_router(state, &config);

    info!(upstream = %config.ollama_base_url(), "Forwarding to Ollama");
    info!("Point OpenAI clients at: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

/// Parse a JSON body into `T`, mapping failures to a 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| {
        error!("Failed to parse request: {e}");
        HttpError::BadRequest(format!("Invalid request body: {e}"))
    })
}

/// Service information.
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "scribe: OpenAI-compatible Ollama gateway with blog agent",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat_completions": "/v1/chat/completions",
            "models": "/v1/models",
            "draft_post": "/tool/draft_post",
            "web_interface": "/static/index.html",
            "health": "/health"
        }
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "upstream_url": state.ollama.base_url()
    }))
}

/// Fixed model catalog in OpenAI format.
async fn list_models() -> impl IntoResponse {
    debug!("GET /v1/models");
    Json(ModelsResponse::catalog())
}

/// Translate a chat completion to Ollama, streaming or not.
async fn chat_completions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let request: ChatCompletionRequest = parse_body(&body)?;
    request.validate()?;

    info!(
        model = %request.model,
        streaming = %request.stream,
        messages = request.messages.len(),
        "Processing chat completion request"
    );

    if request.stream {
        let frames = state.ollama.stream_chat(&request).await?;
        Ok(sse_response(frames))
    } else {
        let response = state.ollama.complete(&request).await?;
        Ok(Json(response).into_response())
    }
}

/// Generate a draft post file for a topic.
async fn draft_post(State(state): State<AppState>, body: Bytes) -> Result<Response, HttpError> {
    let request: DraftPostRequest = parse_body(&body)?;

    let response = state.drafts.draft_post(&request).await?;
    Ok(Json(response).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_models() {
        let response = list_models().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_parse_body_rejects_garbage() {
        let result = parse_body::<DraftPostRequest>(&Bytes::from_static(b"{not json"));
        assert!(matches!(result, Err(HttpError::BadRequest(_))));
    }
}
