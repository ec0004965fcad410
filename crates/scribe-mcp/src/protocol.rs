//! JSON-RPC 2.0 message types for the MCP stdio channel.
//!
//! Reference: <https://spec.modelcontextprotocol.io/>

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes used by this server.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Inbound request or notification.
///
/// A message without an `id` is a notification and gets no response. An
/// explicit `"id": null` still counts as present and is echoed back.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
}

/// Keep a present `null` as `Some(Value::Null)`; only an absent field is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with("notifications/")
    }
}

/// Outbound response: exactly one of `result` or `error` is present.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// One block of tool output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Result envelope of `tools/call`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    /// Machine-readable form of the same result, when there is one.
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: text.into(),
            }],
            structured_content: None,
        }
    }

    #[must_use]
    pub fn with_structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", |c| c.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_parsing() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Some(json!(7)));
        assert!(request.params.is_none());
        assert!(!request.is_notification());
    }

    #[test]
    fn test_notifications() {
        let without_id: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
        assert!(without_id.is_notification());

        let initialized: JsonRpcRequest = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"method":"notifications/initialized"}"#,
        )
        .unwrap();
        assert!(initialized.is_notification());
    }

    #[test]
    fn test_null_id_is_a_request() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#).unwrap();
        assert_eq!(request.id, Some(Value::Null));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_error_response_serialization() {
        let response = JsonRpcResponse::failure(json!("a"), codes::METHOD_NOT_FOUND, "nope");
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": "a", "error": {"code": -32601, "message": "nope"}})
        );
    }

    #[test]
    fn test_tool_result_envelope() {
        let value = serde_json::to_value(ToolResult::text("hi")).unwrap();
        assert_eq!(value, json!({"content": [{"type": "text", "text": "hi"}]}));

        let value =
            serde_json::to_value(ToolResult::text("hi").with_structured(json!({"a": 1}))).unwrap();
        assert_eq!(value["structuredContent"]["a"], 1);
    }
}
