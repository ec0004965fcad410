//! Line-oriented MCP server.
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! Lines that are not JSON are skipped; notifications get no response.

use std::io;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::dispatcher::{CommandDispatcher, DispatchError, parse_args};
use crate::gateway::ApiGateway;
use crate::prompts::{prompt_definitions, render};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, codes};
use crate::tools::tool_definitions;

const SERVER_NAME: &str = "scribe";

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

/// MCP server for one stdio connection.
pub struct McpServer {
    dispatcher: CommandDispatcher,
    api: Arc<dyn ApiGateway>,
    api_base_url: String,
}

impl McpServer {
    /// `api_base_url` is the base of the scribe HTTP API that `api` reads;
    /// resources are listed under it and reads outside it are refused.
    pub fn new(
        dispatcher: CommandDispatcher,
        api: Arc<dyn ApiGateway>,
        api_base_url: impl Into<String>,
    ) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            dispatcher,
            api,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub const fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Serve until `reader` reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Serve on the process's stdin and stdout.
    pub async fn serve_stdio(&self) -> io::Result<()> {
        info!("MCP server listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Handle one input line, returning the response to write, if any.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Ok(value) = serde_json::from_str::<Value>(line) else {
            debug!("Skipping non-JSON input line");
            return None;
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Malformed JSON-RPC request: {e}");
                Some(JsonRpcResponse::failure(
                    id,
                    codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    /// Handle a parsed request. Notifications produce no response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        let response = match self.route(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                debug!(method = %request.method, code = e.code(), "Request failed: {e}");
                JsonRpcResponse::failure(id, e.code(), e.to_string())
            }
        };
        Some(response)
    }

    async fn route(&self, method: &str, params: Option<Value>) -> Result<Value, DispatchError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}, "resources": {}, "prompts": {}},
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
            })),
            "tools/list" => Ok(json!({"tools": tool_definitions()})),
            "tools/call" => {
                let params: CallToolParams = parse_args(method, params)?;
                let result = self.dispatcher.call(&params.name, params.arguments).await?;
                Ok(serde_json::to_value(result).map_err(scribe_core::CoreError::from)?)
            }
            "resources/list" => Ok(json!({"resources": self.resources()})),
            "resources/read" => {
                let params: ReadResourceParams = parse_args(method, params)?;
                self.read_resource(&params.uri).await
            }
            "prompts/list" => Ok(json!({"prompts": prompt_definitions()})),
            "prompts/get" => {
                let params: GetPromptParams = parse_args(method, params)?;
                get_prompt(&params)
            }
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        }
    }

    fn resources(&self) -> Value {
        let base = &self.api_base_url;
        json!([
            {
                "uri": format!("{base}/v1/chat/completions"),
                "name": "chat_completions",
                "description": "OpenAI-compatible chat completions endpoint",
                "mimeType": "application/json"
            },
            {
                "uri": format!("{base}/health"),
                "name": "health",
                "description": "Health check endpoint",
                "mimeType": "application/json"
            },
            {
                "uri": format!("{base}/v1/models"),
                "name": "models",
                "description": "List available models",
                "mimeType": "application/json"
            }
        ])
    }

    async fn read_resource(&self, uri: &str) -> Result<Value, DispatchError> {
        let path = uri
            .strip_prefix(self.api_base_url.as_str())
            .filter(|p| p.starts_with('/'))
            .ok_or_else(|| DispatchError::InvalidParams {
                tool: "resources/read".to_string(),
                reason: format!("Resource must be under {}", self.api_base_url),
            })?;

        let content = self.api.get_json(path).await?;
        let text = serde_json::to_string_pretty(&content).map_err(scribe_core::CoreError::from)?;

        Ok(json!({
            "contents": [{"uri": uri, "mimeType": "application/json", "text": text}]
        }))
    }
}

fn get_prompt(params: &GetPromptParams) -> Result<Value, DispatchError> {
    let content = render(&params.name, |key| {
        params.arguments.get(key).and_then(Value::as_str)
    })
    .ok_or_else(|| DispatchError::InvalidParams {
        tool: "prompts/get".to_string(),
        reason: format!("Unknown prompt: {}", params.name),
    })?;

    Ok(json!({
        "description": format!("Generated prompt: {}", params.name),
        "messages": [{"role": "system", "content": {"type": "text", "text": content}}]
    }))
}
