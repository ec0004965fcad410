//! In-memory fakes of the core ports for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Usage,
};
use crate::error::CoreError;
use crate::ports::ChatCompletionPort;

/// A completion port that answers every request with a canned reply.
///
/// Requests are recorded so tests can assert on what was sent. Model
/// listing fails unless a list was configured with [`Self::with_models`].
#[derive(Debug, Default)]
pub struct FakeCompletionPort {
    reply: Option<String>,
    models: Option<Vec<String>>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl FakeCompletionPort {
    /// A port that always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    /// A port whose runtime is unreachable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Report these models from `list_models`.
    #[must_use]
    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = Some(models.iter().map(ToString::to_string).collect());
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionPort for FakeCompletionPort {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CoreError> {
        let Some(reply) = &self.reply else {
            return Err(CoreError::UpstreamUnavailable("connection refused".to_string()));
        };
        self.requests.lock().unwrap().push(request.clone());

        Ok(ChatCompletionResponse {
            id: "chatcmpl-fake".to_string(),
            object: "chat.completion".to_string(),
            created: Utc::now().timestamp(),
            model: request.model.clone(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(reply.clone()),
                finish_reason: Some("stop".to_string()),
            }],
            usage: Usage::estimate(&request.messages, reply),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, CoreError> {
        self.models
            .clone()
            .ok_or_else(|| CoreError::UpstreamUnavailable("connection refused".to_string()))
    }
}
