//! Chat completion port.
//!
//! This port is the only way the writing services reach a language model.
//! The HTTP adapter implements it against an Ollama runtime; tests use the
//! in-memory fake from `crate::testing`.

use async_trait::async_trait;
use std::fmt;

use crate::domain::{ChatCompletionRequest, ChatCompletionResponse};
use crate::error::CoreError;

/// Port for non-streaming chat completions against the upstream runtime.
#[async_trait]
pub trait ChatCompletionPort: Send + Sync + fmt::Debug {
    /// Run a chat completion and return it in OpenAI shape.
    ///
    /// The `stream` flag of the request is ignored: this call always waits
    /// for the full reply.
    ///
    /// # Errors
    ///
    /// - `CoreError::UpstreamUnavailable` if the runtime cannot be reached
    /// - `CoreError::UpstreamRejected` if it answers with a non-2xx status
    /// - `CoreError::Internal` for anything else (e.g. an undecodable body)
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CoreError>;

    /// Names of the models the runtime currently has installed.
    async fn list_models(&self) -> Result<Vec<String>, CoreError>;
}
