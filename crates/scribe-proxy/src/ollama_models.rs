//! Ollama native API wire types.
//!
//! Only the fields the gateway reads or writes are modelled; unknown fields
//! in upstream payloads are ignored.

use serde::{Deserialize, Serialize};

// =============================================================================
// /api/chat
// =============================================================================

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    pub options: OllamaOptions,
}

/// Sampling options. Unset fields are left out so the runtime's defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// A chat message in Ollama format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Non-streaming `/api/chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    pub message: OllamaMessage,
}

/// One line of a streaming `/api/chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaStreamLine {
    #[serde(default)]
    pub message: Option<OllamaStreamMessage>,
    #[serde(default)]
    pub done: bool,
}

/// Message fragment inside a stream line.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaStreamMessage {
    #[serde(default)]
    pub content: String,
}

// =============================================================================
// /api/tags
// =============================================================================

/// Response of `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModelTag>,
}

/// An installed model.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelTag {
    pub name: String,
}
