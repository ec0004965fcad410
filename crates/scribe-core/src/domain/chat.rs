//! Chat domain types.
//!
//! These are the OpenAI-shaped chat completion types shared by the HTTP
//! gateway, the writing services and the command channel. Upstream-native
//! shapes live in the adapter that talks to the runtime.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default sampling temperature when a request does not mention one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message. Ordering within a conversation is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[allow(clippy::unnecessary_wraps)]
const fn default_temperature() -> Option<f32> {
    Some(DEFAULT_TEMPERATURE)
}

/// Request to `/v1/chat/completions`.
///
/// An absent `temperature` defaults to 0.7; an explicit `null` means
/// "leave it to the runtime" and is dropped from the upstream request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name to use.
    pub model: String,
    /// Array of chat messages. Must not be empty.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0-2).
    #[serde(default = "default_temperature")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response.
    #[serde(default)]
    pub stream: bool,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl ChatCompletionRequest {
    /// Build a non-streaming request with the default temperature.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
            stream: false,
            stop: None,
        }
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check the field ranges the wire format cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.model.trim().is_empty() {
            return Err(CoreError::InvalidInput("model must not be empty".to_string()));
        }
        if self.messages.is_empty() {
            return Err(CoreError::InvalidInput(
                "messages must contain at least one message".to_string(),
            ));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(CoreError::InvalidInput(format!(
                "temperature must be between 0 and 2, got {t}"
            )));
        }
        if self.max_tokens == Some(0) {
            return Err(CoreError::InvalidInput(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response from `/v1/chat/completions` (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// Content of the first choice, or an empty string when there is none.
    pub fn first_content(&self) -> &str {
        self.choices
            .first()
            .map_or("", |choice| choice.message.content.as_str())
    }
}

/// A single chat completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
///
/// These are whitespace word counts, an approximation of real tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Estimate usage from the prompt messages and the generated reply.
    pub fn estimate(messages: &[ChatMessage], reply: &str) -> Self {
        let prompt_tokens = messages.iter().map(|m| word_count(&m.content)).sum();
        let completion_tokens = word_count(reply);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Count whitespace-delimited words.
pub fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}
