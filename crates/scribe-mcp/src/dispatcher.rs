//! Tool name → operation dispatch.
//!
//! One dispatcher serves one connection. It remembers the most recently
//! started writing session so the shorthand tools (`chat`, `update`,
//! `save`, `status`) can omit the session id.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use scribe_core::{
    ChatCompletionPort, ChatCompletionRequest, CoreError, DraftPostRequest, DraftService,
    SessionId, SessionManager,
};

use crate::gateway::ApiGateway;
use crate::protocol::{ToolResult, codes};
use crate::tools::{
    ChatAboutPostArgs, ChatArgs, EndSessionArgs, SaveArgs, SaveDraftArgs, SessionArgs,
    StartSessionArgs, UpdateArgs, UpdateDraftArgs,
};

/// Errors raised while dispatching a tool call.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Method not found: {0}")]
    UnknownMethod(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidParams { tool: String, reason: String },

    #[error("No active writing session. Please start a session first with start_writing_session")]
    NoActiveSession,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DispatchError {
    /// JSON-RPC error code for this error.
    pub const fn code(&self) -> i64 {
        match self {
            Self::UnknownMethod(_) | Self::UnknownTool(_) => codes::METHOD_NOT_FOUND,
            Self::InvalidParams { .. }
            | Self::NoActiveSession
            | Self::Core(
                CoreError::SessionNotFound(_) | CoreError::InvalidInput(_) | CoreError::NoContent,
            ) => codes::INVALID_PARAMS,
            Self::Core(
                CoreError::UpstreamUnavailable(_)
                | CoreError::UpstreamRejected { .. }
                | CoreError::Internal(_),
            ) => codes::INTERNAL_ERROR,
        }
    }
}

/// Routes `tools/call` requests to the writing services.
pub struct CommandDispatcher {
    completions: Arc<dyn ChatCompletionPort>,
    sessions: Arc<SessionManager>,
    drafts: Arc<DraftService>,
    api: Arc<dyn ApiGateway>,
    active_session: Mutex<Option<SessionId>>,
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("completions", &self.completions)
            .field("sessions", &self.sessions)
            .field("drafts", &self.drafts)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    pub fn new(
        completions: Arc<dyn ChatCompletionPort>,
        sessions: Arc<SessionManager>,
        drafts: Arc<DraftService>,
        api: Arc<dyn ApiGateway>,
    ) -> Self {
        Self {
            completions,
            sessions,
            drafts,
            api,
            active_session: Mutex::new(None),
        }
    }

    /// Build a dispatcher whose services all share one completion port.
    pub fn with_port(completions: Arc<dyn ChatCompletionPort>, api: Arc<dyn ApiGateway>) -> Self {
        let sessions = Arc::new(SessionManager::new(Arc::clone(&completions)));
        let drafts = Arc::new(DraftService::new(Arc::clone(&completions)));
        Self::new(completions, sessions, drafts, api)
    }

    /// Draft posts with a different file extension (without the dot).
    ///
    /// Replaces the drafting service with one over the dispatcher's port.
    #[must_use]
    pub fn with_draft_extension(mut self, extension: impl Into<String>) -> Self {
        let drafts = DraftService::new(Arc::clone(&self.completions)).with_extension(extension);
        self.drafts = Arc::new(drafts);
        self
    }

    /// Id of the session the shorthand tools act on, if any.
    pub async fn active_session(&self) -> Option<SessionId> {
        self.active_session.lock().await.clone()
    }

    async fn require_active(&self) -> Result<SessionId, DispatchError> {
        self.active_session()
            .await
            .ok_or(DispatchError::NoActiveSession)
    }

    /// Invoke the tool `name` with `arguments`.
    ///
    /// Arguments are fully validated before any operation runs.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> Result<ToolResult, DispatchError> {
        debug!(tool = %name, "Dispatching tool call");

        match name {
            "chat_completion" => self.chat_completion(parse_args(name, arguments)?).await,
            "health_check" => self.health_check().await,
            "list_models" => self.list_models().await,
            "draft_post" => self.draft_post(parse_args(name, arguments)?).await,
            "start_writing_session" => self.start_session(parse_args(name, arguments)?).await,
            "chat_about_post" => {
                let args: ChatAboutPostArgs = parse_args(name, arguments)?;
                self.chat(&args.session_id, &args.message, &args.model).await
            }
            "chat" => {
                let args: ChatArgs = parse_args(name, arguments)?;
                let id = self.require_active().await?;
                self.chat(id.as_str(), &args.message, &args.model).await
            }
            "update_draft" => {
                let args: UpdateDraftArgs = parse_args(name, arguments)?;
                self.update_draft(&args.session_id, args.content).await
            }
            "update" => {
                let args: UpdateArgs = parse_args(name, arguments)?;
                let id = self.require_active().await?;
                self.update_draft(id.as_str(), args.content).await
            }
            "save_draft" => {
                let args: SaveDraftArgs = parse_args(name, arguments)?;
                self.save_draft(&args.session_id, args.filename.as_deref()).await
            }
            "save" => {
                let args: SaveArgs = parse_args(name, arguments)?;
                let id = self.require_active().await?;
                self.save_draft(id.as_str(), args.filename.as_deref()).await
            }
            "get_session_status" => {
                let args: SessionArgs = parse_args(name, arguments)?;
                self.status(&args.session_id).await
            }
            "status" => {
                let id = self.require_active().await?;
                self.status(id.as_str()).await
            }
            "end_session" => self.end_session(parse_args(name, arguments)?).await,
            other => Err(DispatchError::UnknownTool(other.to_string())),
        }
    }

    // =========================================================================
    // One-shot tools
    // =========================================================================

    async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ToolResult, DispatchError> {
        request.validate()?;
        // The channel is line-oriented; a streamed reply is collected whole.
        let request = ChatCompletionRequest {
            stream: false,
            ..request
        };

        let response = self.completions.complete(&request).await?;
        Ok(ToolResult::text(response.first_content())
            .with_structured(serde_json::to_value(&response).map_err(CoreError::from)?))
    }

    async fn draft_post(&self, request: DraftPostRequest) -> Result<ToolResult, DispatchError> {
        let response = self.drafts.draft_post(&request).await?;

        let mut text = format!(
            "Blog post draft created!\n\nFilename: {}\nPath: {}\n\nPreview:\n{}",
            response.filename, response.full_path, response.preview
        );
        if let Some(issues) = &response.content_issues {
            text.push_str("\n\nContent issues:");
            for issue in issues {
                text.push_str("\n- ");
                text.push_str(issue);
            }
        }

        Ok(ToolResult::text(text)
            .with_structured(serde_json::to_value(&response).map_err(CoreError::from)?))
    }

    // =========================================================================
    // API passthrough
    // =========================================================================

    async fn health_check(&self) -> Result<ToolResult, DispatchError> {
        let health = self.api.get_json("/health").await?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        Ok(ToolResult::text(format!("Health Status: {status}")).with_structured(health))
    }

    async fn list_models(&self) -> Result<ToolResult, DispatchError> {
        let models = self.api.get_json("/v1/models").await?;
        let ids: Vec<&str> = models
            .get("data")
            .and_then(Value::as_array)
            .map(|data| data.iter().filter_map(|m| m.get("id")?.as_str()).collect())
            .unwrap_or_default();

        Ok(ToolResult::text(format!("Available models: {}", ids.join(", "))).with_structured(models))
    }

    // =========================================================================
    // Writing sessions
    // =========================================================================

    async fn start_session(&self, args: StartSessionArgs) -> Result<ToolResult, DispatchError> {
        let id = self
            .sessions
            .start_session(&args.blog_folder, args.topic.clone())
            .await;
        *self.active_session.lock().await = Some(id.clone());
        info!(session_id = %id, "Active session set");

        let text = format!(
            "Session started. You can now chat about your blog post!\n\nSession ID: {id}\nTopic: {}\nBlog folder: {}\n\nNext steps:\n- Use chat_about_post to discuss ideas\n- Use update_draft to modify content\n- Use save_draft when ready to save",
            args.topic, args.blog_folder
        );
        Ok(ToolResult::text(text).with_structured(json!({
            "session_id": id,
            "topic": args.topic,
            "blog_folder": args.blog_folder,
            "status": "Session started. You can now chat about your blog post!",
            "next_steps": [
                "Use chat_about_post to discuss ideas",
                "Use update_draft to modify content",
                "Use save_draft when ready to save"
            ]
        })))
    }

    async fn chat(&self, id: &str, message: &str, model: &str) -> Result<ToolResult, DispatchError> {
        let reply = self.sessions.chat(id, message, model).await?;
        let structured = json!({"response": reply, "session_id": id});
        Ok(ToolResult::text(reply).with_structured(structured))
    }

    async fn update_draft(&self, id: &str, content: String) -> Result<ToolResult, DispatchError> {
        let length = content.chars().count();
        self.sessions.update_draft(id, content).await?;

        let result = format!("Draft updated ({length} characters)");
        Ok(ToolResult::text(result.clone())
            .with_structured(json!({"result": result, "session_id": id})))
    }

    async fn save_draft(&self, id: &str, filename: Option<&str>) -> Result<ToolResult, DispatchError> {
        let path = self.sessions.save_draft(id, filename).await?;

        let result = format!("Draft saved to: {}", path.display());
        Ok(ToolResult::text(result.clone()).with_structured(json!({
            "result": result,
            "path": path.display().to_string(),
            "session_id": id
        })))
    }

    async fn status(&self, id: &str) -> Result<ToolResult, DispatchError> {
        let status = self.sessions.status(id).await?;

        let text = format!(
            "Session {}\nTopic: {}\nBlog folder: {}\nDraft length: {} characters\nConversation turns: {}\nCreated at: {}",
            status.session_id,
            status.topic,
            status.blog_folder,
            status.draft_length,
            status.conversation_turns,
            status.created_at
        );
        Ok(ToolResult::text(text)
            .with_structured(serde_json::to_value(&status).map_err(CoreError::from)?))
    }

    async fn end_session(&self, args: EndSessionArgs) -> Result<ToolResult, DispatchError> {
        let id = match args.session_id {
            Some(id) => SessionId::from(id),
            None => self.require_active().await?,
        };

        let status = self.sessions.end_session(id.as_str()).await?;

        let mut active = self.active_session.lock().await;
        if active.as_ref() == Some(&id) {
            *active = None;
        }
        drop(active);

        Ok(ToolResult::text(format!("Session {id} ended"))
            .with_structured(serde_json::to_value(&status).map_err(CoreError::from)?))
    }
}

/// Deserialize tool arguments; absent arguments are an empty object.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Option<Value>) -> Result<T, DispatchError> {
    let value = match arguments {
        None | Some(Value::Null) => json!({}),
        Some(value) => value,
    };

    serde_json::from_value(value).map_err(|e| DispatchError::InvalidParams {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
