//! Core domain types.
//!
//! # Structure
//!
//! - `chat` - OpenAI-shaped chat completion request/response types
//! - `draft` - Draft post request/response types
//! - `session` - Interactive writing session state

pub mod chat;
pub mod draft;
pub mod session;

pub use chat::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, DEFAULT_TEMPERATURE,
    MessageRole, Usage, word_count,
};
pub use draft::{DEFAULT_BLOG_FOLDER, DEFAULT_DRAFT_MODEL, DraftPostRequest, DraftPostResponse};
pub use session::{SessionId, SessionStatus, WritingSession};
