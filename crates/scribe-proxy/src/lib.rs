//! OpenAI-compatible HTTP gateway in front of a local Ollama runtime.
//!
//! Clients speak the OpenAI chat completions API; requests are translated
//! to Ollama's native `/api/chat` and replies (including NDJSON streams) are
//! translated back. The gateway also exposes the one-shot `draft_post` tool.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used by the router integration tests
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod config;
pub mod error;
pub mod models;
pub mod ollama;
pub mod ollama_models;
pub mod server;
pub mod stream;
pub mod translate;

pub use config::{ConfigError, CorsConfig, DEFAULT_OLLAMA_URL, DEFAULT_PORT, ProxyConfig};
pub use error::HttpError;
pub use ollama::OllamaClient;
pub use server::{AppState, create_router, serve};
