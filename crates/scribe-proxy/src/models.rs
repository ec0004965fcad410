//! OpenAI API data models for the gateway surface.
//!
//! Request/response types shared with the services live in `scribe-core`;
//! this module holds the shapes only the HTTP layer produces.

use serde::Serialize;

// =============================================================================
// Streaming Types
// =============================================================================

/// Streaming chunk from `/v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
}

/// A single streaming choice.
#[derive(Debug, Clone, Serialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    /// Serialized as `null` until the terminal chunk.
    pub finish_reason: Option<&'static str>,
}

/// Delta content in a streaming response. The terminal delta is `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Creation timestamp reported for every catalog entry.
const CATALOG_CREATED: i64 = 1_677_610_602;

/// Models advertised by `/v1/models`.
const CATALOG: &[&str] = &["llama2", "codellama", "mistral"];

/// Response from `/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub object: &'static str,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    /// The fixed catalog this gateway advertises.
    pub fn catalog() -> Self {
        Self {
            object: "list",
            data: CATALOG
                .iter()
                .map(|id| ModelInfo {
                    id: (*id).to_string(),
                    object: "model",
                    created: CATALOG_CREATED,
                    owned_by: "ollama",
                })
                .collect(),
        }
    }
}

/// Information about a single model (OpenAI format).
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub owned_by: &'static str,
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching OpenAI format.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: None,
            },
        }
    }

    /// Create an error response with a code.
    pub fn with_code(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: Some(code.into()),
            },
        }
    }

    /// Create an error response for upstream connection failure.
    pub fn upstream_unavailable(reason: &str) -> Self {
        Self::with_code(
            format!("Failed to connect to Ollama: {reason}"),
            "service_unavailable",
            "upstream_unavailable",
        )
    }
}
