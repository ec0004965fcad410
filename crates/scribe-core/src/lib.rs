//! Core domain types, ports and writing services for scribe.
//!
//! This crate knows nothing about HTTP or JSON-RPC. Adapters implement
//! [`ChatCompletionPort`] against a real runtime and expose the services.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;
pub mod posts;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use content::ContentStats;
pub use domain::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, DraftPostRequest,
    DraftPostResponse, MessageRole, SessionId, SessionStatus, Usage, WritingSession,
};
pub use error::CoreError;
pub use ports::ChatCompletionPort;
pub use services::{DraftService, SessionManager};
