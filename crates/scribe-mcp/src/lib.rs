//! MCP (Model Context Protocol) server for scribe.
//!
//! Exposes the writing tools (one-shot drafting, interactive writing
//! sessions, chat completion) to editor integrations over a line-oriented
//! JSON-RPC 2.0 channel on stdio.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod dispatcher;
pub mod gateway;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod tools;

pub use dispatcher::{CommandDispatcher, DispatchError};
pub use gateway::{ApiGateway, DEFAULT_API_URL, HttpApiGateway};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, ToolResult};
pub use server::McpServer;
