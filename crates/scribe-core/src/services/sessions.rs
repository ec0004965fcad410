//! Interactive writing sessions.
//!
//! The [`SessionManager`] owns every live [`WritingSession`]. Sessions are
//! locked individually: two sessions never wait on each other, and calls on
//! the same session run one at a time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::{
    ChatCompletionRequest, ChatMessage, SessionId, SessionStatus, WritingSession,
};
use crate::error::CoreError;
use crate::ports::ChatCompletionPort;
use crate::posts::{dated_stem, session_front_matter, write_unique};

/// Sampling temperature for session chat.
const CHAT_TEMPERATURE: f32 = 0.7;
/// Reply budget for session chat.
const CHAT_MAX_TOKENS: u32 = 1500;
/// Saved drafts are always markdown.
const DRAFT_EXTENSION: &str = "md";

type SharedSession = Arc<Mutex<WritingSession>>;

/// In-memory store of writing sessions.
///
/// Sessions live until [`SessionManager::end_session`] is called or the
/// process exits.
pub struct SessionManager {
    completions: Arc<dyn ChatCompletionPort>,
    sessions: RwLock<HashMap<SessionId, SharedSession>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("completions", &self.completions)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create an empty session store backed by the given completion port.
    pub fn new(completions: Arc<dyn ChatCompletionPort>) -> Self {
        Self {
            completions,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session and return its id.
    pub async fn start_session(
        &self,
        blog_folder: impl Into<PathBuf>,
        topic: impl Into<String>,
    ) -> SessionId {
        let session = WritingSession::new(blog_folder, topic);
        let id = session.id.clone();

        info!(session_id = %id, topic = %session.topic, "Started writing session");
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    async fn get(&self, id: &str) -> Result<SharedSession, CoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))
    }

    /// Send a message about the post and return the assistant's reply.
    ///
    /// The user message and the reply are appended to the history only
    /// after the model answered; a failed call leaves the session untouched.
    pub async fn chat(&self, id: &str, message: &str, model: &str) -> Result<String, CoreError> {
        let session = self.get(id).await?;
        let mut session = session.lock().await;

        let mut messages = Vec::with_capacity(session.history.len() + 2);
        messages.push(ChatMessage::system(system_prompt(&session.topic, &session.draft)));
        messages.extend(session.history.iter().cloned());
        messages.push(ChatMessage::user(message));

        let request = ChatCompletionRequest::new(model, messages)
            .with_temperature(Some(CHAT_TEMPERATURE))
            .with_max_tokens(CHAT_MAX_TOKENS);

        debug!(session_id = %id, model = %model, "Chatting about post");
        let response = self.completions.complete(&request).await?;
        let reply = response.first_content().to_string();

        session.history.push(ChatMessage::user(message));
        session.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Replace the draft text wholesale.
    pub async fn update_draft(&self, id: &str, content: impl Into<String>) -> Result<(), CoreError> {
        let session = self.get(id).await?;
        session.lock().await.draft = content.into();
        debug!(session_id = %id, "Draft updated");
        Ok(())
    }

    /// Save the draft as a markdown file in the session's blog folder.
    ///
    /// Without a filename the name is `{date}-{slug}.md`. Front matter is
    /// added unless the draft already starts with one. An existing file is
    /// never overwritten; the name gets a numbered suffix instead.
    pub async fn save_draft(&self, id: &str, filename: Option<&str>) -> Result<PathBuf, CoreError> {
        let session = self.get(id).await?;
        let session = session.lock().await;

        if session.draft.trim().is_empty() {
            return Err(CoreError::NoContent);
        }

        let today = Local::now().date_naive();
        let stem = match filename {
            Some(name) => markdown_stem(name)?,
            None => dated_stem(today, &session.topic),
        };

        let content = if session.draft.starts_with("---") {
            session.draft.clone()
        } else {
            format!(
                "{}{}",
                session_front_matter(&session.topic, today),
                session.draft
            )
        };

        let path = write_unique(&session.blog_folder, &stem, DRAFT_EXTENSION, &content).await?;
        info!(session_id = %id, path = %path.display(), "Draft saved");
        Ok(path)
    }

    /// Snapshot of a session.
    pub async fn status(&self, id: &str) -> Result<SessionStatus, CoreError> {
        let session = self.get(id).await?;
        let status = session.lock().await.status();
        Ok(status)
    }

    /// Dispose of a session, returning its final status.
    pub async fn end_session(&self, id: &str) -> Result<SessionStatus, CoreError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))?;

        let status = session.lock().await.status();
        info!(session_id = %id, "Ended writing session");
        Ok(status)
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// File stem from a caller-supplied name, without directories or `.md`.
fn markdown_stem(name: &str) -> Result<String, CoreError> {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CoreError::InvalidInput(format!("invalid filename: '{name}'")))?;

    let stem = base.strip_suffix(".md").unwrap_or(base);
    if stem.is_empty() {
        return Err(CoreError::InvalidInput(format!("invalid filename: '{name}'")));
    }
    Ok(stem.to_string())
}

fn system_prompt(topic: &str, draft: &str) -> String {
    let draft = if draft.is_empty() { "No content yet" } else { draft };
    format!(
        "You are an expert blog writing assistant. You're helping write a blog post about \"{topic}\".

Current draft content:
{draft}

You should:
1. Help refine ideas and structure
2. Suggest content improvements
3. Write specific sections when asked
4. Provide feedback on existing content
5. Help with formatting and organization

Be conversational and collaborative. Ask clarifying questions when needed."
    )
}
