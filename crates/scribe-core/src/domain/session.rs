//! Interactive writing session state.

use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;

/// Identifier of a writing session.
///
/// Format: `session_<YYYYmmdd_HHMMSS>_<8 hex chars>`. The random suffix keeps
/// ids unique when several sessions start within the same second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier from the wall clock and a random suffix.
    pub fn generate() -> Self {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("session_{stamp}_{}", &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversation state for one post being written.
#[derive(Debug, Clone)]
pub struct WritingSession {
    pub id: SessionId,
    pub blog_folder: PathBuf,
    pub topic: String,
    /// Replaced wholesale by `update_draft`.
    pub draft: String,
    /// Append-only, alternating user/assistant turns.
    pub history: Vec<ChatMessage>,
    pub created_at: DateTime<Local>,
}

impl WritingSession {
    pub fn new(blog_folder: impl Into<PathBuf>, topic: impl Into<String>) -> Self {
        Self {
            id: SessionId::generate(),
            blog_folder: blog_folder.into(),
            topic: topic.into(),
            draft: String::new(),
            history: Vec::new(),
            created_at: Local::now(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id.clone(),
            topic: self.topic.clone(),
            blog_folder: self.blog_folder.display().to_string(),
            draft_length: self.draft.chars().count(),
            conversation_turns: self.history.len() / 2,
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

/// Snapshot reported by `get_session_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub topic: String,
    pub blog_folder: String,
    /// Length of the draft in characters.
    pub draft_length: usize,
    pub conversation_turns: usize,
    pub created_at: String,
}
