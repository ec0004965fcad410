//! OpenAI ↔ Ollama request/response translation.
//!
//! Pure functions; the network side lives in `crate::ollama`.

use chrono::Utc;

use scribe_core::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, MessageRole, Usage,
};

use crate::ollama_models::{OllamaChatRequest, OllamaChatResponse, OllamaMessage, OllamaOptions};

/// Fresh OpenAI-style completion id.
pub fn completion_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())
}

/// Build the Ollama request for an OpenAI chat request.
///
/// Messages are copied verbatim. Only the options the caller set are sent.
pub fn to_ollama_request(request: &ChatCompletionRequest, stream: bool) -> OllamaChatRequest {
    OllamaChatRequest {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect(),
        stream,
        options: OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stop: request.stop.clone(),
        },
    }
}

/// Wrap an Ollama reply in an OpenAI chat completion envelope.
pub fn from_ollama_response(
    request: &ChatCompletionRequest,
    response: OllamaChatResponse,
) -> ChatCompletionResponse {
    let role = MessageRole::parse(&response.message.role).unwrap_or(MessageRole::Assistant);
    let content = response.message.content;
    let usage = Usage::estimate(&request.messages, &content);

    ChatCompletionResponse {
        id: completion_id(),
        object: "chat.completion".to_string(),
        created: Utc::now().timestamp(),
        model: request.model.clone(),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage::new(role, content),
            finish_reason: Some("stop".to_string()),
        }],
        usage,
    }
}
