//! Integration tests for the gateway routes against a fake Ollama.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{MISSING_MODEL, REPLY_FRAGMENTS, spawn_fake_ollama, unreachable_url};
use scribe_proxy::{AppState, CorsConfig, ProxyConfig, create_router};

fn router_for(upstream: &str) -> Router {
    let config = ProxyConfig::new().with_ollama_url(upstream);
    let state = AppState::new(&config).unwrap();
    create_router(state, &config)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn health_reports_upstream() {
    let upstream = spawn_fake_ollama().await;
    let response = router_for(&upstream).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["upstream_url"], upstream.as_str());
}

#[tokio::test]
async fn root_lists_endpoints() {
    let response = router_for(&unreachable_url().await)
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["endpoints"]["chat_completions"], "/v1/chat/completions");
}

#[tokio::test]
async fn models_are_a_fixed_catalog() {
    // No upstream needed: the catalog is static.
    let response = router_for(&unreachable_url().await)
        .oneshot(get("/v1/models"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["object"], "list");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

fn get_from(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("origin", origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let response = router_for(&unreachable_url().await)
        .oneshot(get_from("/health", "http://editor.example"))
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_restricted_to_configured_origins() {
    let config = ProxyConfig::new()
        .with_ollama_url(unreachable_url().await)
        .with_cors(CorsConfig::from_origins(vec![
            "http://localhost:3000".to_string(),
        ]));
    let router = create_router(AppState::new(&config).unwrap(), &config);

    let allowed = router
        .clone()
        .oneshot(get_from("/health", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );

    let refused = router
        .oneshot(get_from("/health", "http://elsewhere.example"))
        .await
        .unwrap();
    assert!(refused.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn chat_completion_non_streaming() {
    let upstream = spawn_fake_ollama().await;
    let request = json!({
        "model": "llama2",
        "messages": [{"role": "user", "content": "Say hello"}]
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["id"].as_str().unwrap().starts_with("chatcmpl-"));
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["model"], "llama2");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(body["choices"][0]["message"]["content"], "Hello, world");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert_eq!(body["usage"]["prompt_tokens"], 2);
    assert_eq!(body["usage"]["completion_tokens"], 2);
    assert_eq!(body["usage"]["total_tokens"], 4);
}

#[tokio::test]
async fn chat_completion_streaming() {
    let upstream = spawn_fake_ollama().await;
    let request = json!({
        "model": "llama2",
        "messages": [{"role": "user", "content": "Say hello"}],
        "stream": true
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    let frames: Vec<&str> = text
        .split("\n\n")
        .filter(|f| !f.is_empty())
        .map(|f| f.strip_prefix("data: ").unwrap())
        .collect();

    assert_eq!(frames.len(), REPLY_FRAGMENTS.len() + 2);
    assert_eq!(*frames.last().unwrap(), "[DONE]");

    let chunks: Vec<Value> = frames[..frames.len() - 1]
        .iter()
        .map(|f| serde_json::from_str(f).unwrap())
        .collect();
    let id = chunks[0]["id"].as_str().unwrap();
    assert!(chunks.iter().all(|c| c["id"] == id));

    let streamed: String = chunks[..REPLY_FRAGMENTS.len()]
        .iter()
        .map(|c| c["choices"][0]["delta"]["content"].as_str().unwrap())
        .collect();
    assert_eq!(streamed, REPLY_FRAGMENTS.concat());
    assert_eq!(chunks.last().unwrap()["choices"][0]["finish_reason"], "stop");
    assert!(!text.contains("after done"));
}

#[tokio::test]
async fn upstream_status_is_passed_through() {
    let upstream = spawn_fake_ollama().await;
    let request = json!({
        "model": MISSING_MODEL,
        "messages": [{"role": "user", "content": "hi"}]
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "upstream_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn streaming_upstream_status_fails_before_any_frame() {
    let upstream = spawn_fake_ollama().await;
    let request = json!({
        "model": MISSING_MODEL,
        "messages": [{"role": "user", "content": "hi"}],
        "stream": true
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_ne!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "upstream_error");
}

#[tokio::test]
async fn unreachable_upstream_is_service_unavailable() {
    let request = json!({
        "model": "llama2",
        "messages": [{"role": "user", "content": "hi"}],
        "stream": true
    });

    let response = router_for(&unreachable_url().await)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "upstream_unavailable");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat/completions")
        .header("content-type", "application/json")
        .body(Body::from("{\"model\": "))
        .unwrap();

    let response = router_for(&unreachable_url().await)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let request = json!({"model": "llama2", "messages": []});

    let response = router_for(&unreachable_url().await)
        .oneshot(post_json("/v1/chat/completions", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn draft_post_writes_into_blog_folder() {
    let upstream = spawn_fake_ollama().await;
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "topic": "Rust Ownership",
        "blog_folder": dir.path().to_string_lossy()
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/tool/draft_post", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("-rust-ownership.qmd"));
    assert!(dir.path().join(filename).exists());
    assert_eq!(body["content_stats"]["heading_count"], 2);
    assert!(body["content_issues"][0]
        .as_str()
        .unwrap()
        .starts_with("Content too short"));
}

#[tokio::test]
async fn draft_post_with_unknown_model_is_bad_request() {
    let upstream = spawn_fake_ollama().await;
    let dir = tempfile::tempdir().unwrap();
    let request = json!({
        "topic": "Rust",
        "model": "gpt-4",
        "blog_folder": dir.path().to_string_lossy()
    });

    let response = router_for(&upstream)
        .oneshot(post_json("/tool/draft_post", &request))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
