//! Tool catalog and typed tool arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use scribe_core::domain::DEFAULT_DRAFT_MODEL;

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema,
    }
}

fn no_arguments() -> Value {
    json!({"type": "object", "properties": {}})
}

/// Every tool this server can call.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "chat_completion",
            "Generate chat completion using Ollama models",
            json!({
                "type": "object",
                "properties": {
                    "model": {"type": "string", "description": "Model to use"},
                    "messages": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "role": {"type": "string", "enum": ["system", "user", "assistant"]},
                                "content": {"type": "string"}
                            },
                            "required": ["role", "content"]
                        }
                    },
                    "temperature": {"type": "number", "minimum": 0, "maximum": 2, "default": 0.7},
                    "max_tokens": {"type": "integer", "minimum": 1},
                    "stop": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["model", "messages"]
            }),
        ),
        tool("health_check", "Check API health status", no_arguments()),
        tool("list_models", "List available models", no_arguments()),
        tool(
            "draft_post",
            "Generate a Quarto blog post draft",
            json!({
                "type": "object",
                "properties": {
                    "topic": {"type": "string", "description": "The topic for the blog post"},
                    "model": {"type": "string", "default": DEFAULT_DRAFT_MODEL, "description": "Model to use for generation"},
                    "blog_folder": {"type": "string", "default": "posts", "description": "Target folder for blog posts"}
                },
                "required": ["topic"]
            }),
        ),
        tool(
            "start_writing_session",
            "Start an interactive blog writing session",
            json!({
                "type": "object",
                "properties": {
                    "blog_folder": {"type": "string", "description": "Path to your blog folder", "default": "."},
                    "topic": {"type": "string", "description": "Blog post topic"}
                },
                "required": ["topic"]
            }),
        ),
        tool(
            "chat_about_post",
            "Chat with AI about your blog post",
            json!({
                "type": "object",
                "properties": {
                    "session_id": {"type": "string", "description": "Writing session ID"},
                    "message": {"type": "string", "description": "Your message to the AI"},
                    "model": {"type": "string", "default": DEFAULT_DRAFT_MODEL}
                },
                "required": ["session_id", "message"]
            }),
        ),
        tool(
            "chat",
            "Chat with AI about your current writing session (uses active session)",
            json!({
                "type": "object",
                "properties": {
                    "message": {"type": "string", "description": "Your message to the AI"},
                    "model": {"type": "string", "default": DEFAULT_DRAFT_MODEL}
                },
                "required": ["message"]
            }),
        ),
        tool(
            "update_draft",
            "Update the current blog post draft",
            json!({
                "type": "object",
                "properties": {
                    "session_id": {"type": "string", "description": "Writing session ID"},
                    "content": {"type": "string", "description": "New draft content"}
                },
                "required": ["session_id", "content"]
            }),
        ),
        tool(
            "save_draft",
            "Save the current draft to a file",
            json!({
                "type": "object",
                "properties": {
                    "session_id": {"type": "string", "description": "Writing session ID"},
                    "filename": {"type": "string", "description": "Optional filename"}
                },
                "required": ["session_id"]
            }),
        ),
        tool(
            "get_session_status",
            "Get current writing session status",
            json!({
                "type": "object",
                "properties": {
                    "session_id": {"type": "string", "description": "Writing session ID"}
                },
                "required": ["session_id"]
            }),
        ),
        tool(
            "end_session",
            "End a writing session and discard its state",
            json!({
                "type": "object",
                "properties": {
                    "session_id": {"type": "string", "description": "Writing session ID (defaults to the active session)"}
                }
            }),
        ),
        tool(
            "update",
            "Update the current draft (uses active session)",
            json!({
                "type": "object",
                "properties": {
                    "content": {"type": "string", "description": "New draft content"}
                },
                "required": ["content"]
            }),
        ),
        tool(
            "save",
            "Save the current draft to a file (uses active session)",
            json!({
                "type": "object",
                "properties": {
                    "filename": {"type": "string", "description": "Optional filename"}
                }
            }),
        ),
        tool(
            "status",
            "Get current writing session status (uses active session)",
            no_arguments(),
        ),
    ]
}

// =============================================================================
// Arguments
// =============================================================================

fn default_model() -> String {
    DEFAULT_DRAFT_MODEL.to_string()
}

fn default_session_folder() -> String {
    ".".to_string()
}

#[derive(Debug, Deserialize)]
pub struct StartSessionArgs {
    #[serde(default = "default_session_folder")]
    pub blog_folder: String,
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatAboutPostArgs {
    pub session_id: String,
    pub message: String,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatArgs {
    pub message: String,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDraftArgs {
    pub session_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArgs {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveDraftArgs {
    pub session_id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveArgs {
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionArgs {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EndSessionArgs {
    #[serde(default)]
    pub session_id: Option<String>,
}
