//! Shared fixtures: an in-process stand-in for the Ollama HTTP API.

use axum::{
    Json, Router,
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Model name the fake upstream answers 404 for.
pub const MISSING_MODEL: &str = "no-such-model";

/// Reply text of the fake upstream, streamed as three fragments.
pub const REPLY_FRAGMENTS: [&str; 3] = ["Hello", ", ", "world"];

async fn chat(Json(body): Json<Value>) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    if model == MISSING_MODEL {
        return (
            StatusCode::NOT_FOUND,
            format!("{{\"error\":\"model '{model}' not found\"}}"),
        )
            .into_response();
    }

    if body["stream"].as_bool().unwrap_or(false) {
        let mut ndjson = String::new();
        for fragment in REPLY_FRAGMENTS {
            ndjson.push_str(&json!({"model": model, "message": {"role": "assistant", "content": fragment}, "done": false}).to_string());
            ndjson.push('\n');
        }
        ndjson.push_str(&json!({"model": model, "done": true}).to_string());
        ndjson.push('\n');
        ndjson.push_str("{\"message\":{\"content\":\"after done\"},\"done\":false}\n");

        return Response::builder()
            .header("content-type", "application/x-ndjson")
            .body(Body::from(ndjson))
            .unwrap();
    }

    let content = if body["messages"][0]["role"] == "system" {
        "# Heading One\n\nSome words.\n\n## Heading Two\n\nMore words."
    } else {
        "Hello, world"
    };

    Json(json!({
        "model": model,
        "message": {"role": "assistant", "content": content},
        "done": true
    }))
    .into_response()
}

async fn tags() -> Json<Value> {
    Json(json!({"models": [{"name": "mistral:7b"}, {"name": "llama2"}]}))
}

/// Start the fake upstream and return its base URL.
pub async fn spawn_fake_ollama() -> String {
    let app = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/tags", get(tags));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
