//! Hand-rolled JSON-RPC 2.0 surface for the MCP protocol.
//!
//! One [`McpServer`] exists per session; it owns its dispatcher and
//! serves tools, prompts, and resources. Transports feed it parsed
//! requests and write back whatever it returns (responses without an id
//! are notification acks and are suppressed at the transport).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dispatch::ToolDispatcher;
use crate::{prompts, resources};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn result(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }

    /// Empty ack for notifications; transports drop these.
    pub fn none() -> Self {
        Self {
            jsonrpc: "2.0",
            id: None,
            result: None,
            error: None,
        }
    }

    /// Whether a transport should write this response back.
    pub fn should_send(&self) -> bool {
        self.id.is_some() || self.error.is_some()
    }
}

pub struct McpServer {
    dispatcher: ToolDispatcher,
    widget_base_url: String,
}

impl McpServer {
    pub fn new(dispatcher: ToolDispatcher, widget_base_url: impl Into<String>) -> Self {
        Self {
            dispatcher,
            widget_base_url: widget_base_url.into(),
        }
    }

    /// Fresh server instance (handler bindings and backend client) for
    /// one session.
    pub fn from_config(config: &crate::config::ServerConfig) -> Self {
        let client = ridebook_backend::BackendClient::new(config.api_base_url.as_str());
        Self::new(
            ToolDispatcher::new(std::sync::Arc::new(client), config.default_guest.clone()),
            config.widget_base_url.clone(),
        )
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "notifications/initialized" => JsonRpcResponse::none(),
            "ping" => JsonRpcResponse::result(request.id, json!({})),
            "tools/list" => JsonRpcResponse::result(
                request.id,
                json!({ "tools": self.dispatcher.catalog().definitions() }),
            ),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "prompts/list" => {
                JsonRpcResponse::result(request.id, json!({ "prompts": prompts::list() }))
            }
            "prompts/get" => self.handle_prompts_get(request.id, request.params),
            "resources/list" => {
                JsonRpcResponse::result(request.id, json!({ "resources": resources::list() }))
            }
            "resources/templates/list" => JsonRpcResponse::result(
                request.id,
                json!({ "resourceTemplates": resources::templates() }),
            ),
            "resources/read" => self.handle_resources_read(request.id, request.params),
            other => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "prompts": {},
                    "resources": {},
                },
                "serverInfo": {
                    "name": "ridebook-mcp",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params".to_string());
        };

        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = self.dispatcher.dispatch(tool_name, arguments).await;
        JsonRpcResponse::result(id, result.to_value())
    }

    fn handle_prompts_get(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let name = params
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("");
        match prompts::get(name) {
            Some(prompt) => JsonRpcResponse::result(id, prompt),
            None => JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Unknown prompt: {name}"),
            ),
        }
    }

    fn handle_resources_read(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let uri = params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .unwrap_or("");
        match resources::read(uri, &self.widget_base_url) {
            Some(contents) => JsonRpcResponse::result(id, contents),
            None => {
                JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown resource: {uri}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRideApi;
    use std::sync::Arc;

    fn server_with(api: MockRideApi) -> McpServer {
        McpServer::new(
            ToolDispatcher::new(Arc::new(api), None),
            "http://localhost:3000",
        )
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn initialize_reports_all_three_capabilities() {
        let server = server_with(MockRideApi::returning(json!({})));
        let response = server.handle_request(request("initialize", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn initialized_notification_gets_no_reply() {
        let server = server_with(MockRideApi::returning(json!({})));
        let response = server
            .handle_request(JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: None,
                method: "notifications/initialized".to_string(),
                params: None,
            })
            .await;
        assert!(!response.should_send());
    }

    #[tokio::test]
    async fn tools_list_serves_the_catalog() {
        let server = server_with(MockRideApi::returning(json!({})));
        let response = server.handle_request(request("tools/list", None)).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "get_ride_estimates");
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid() {
        let server = server_with(MockRideApi::returning(json!({})));
        let response = server.handle_request(request("tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn tools_call_wraps_dispatch_results() {
        let server = server_with(MockRideApi::returning(json!({"status": "accepted"})));
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!({
                    "name": "get_ride_details",
                    "arguments": {"request_id": "f3a604eb-8b90-4068-932c-13d6a5002f86"},
                })),
            ))
            .await;
        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());
        let text = result["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["status"], "accepted");
    }

    #[tokio::test]
    async fn unknown_method_is_minus_32601() {
        let server = server_with(MockRideApi::returning(json!({})));
        let response = server.handle_request(request("tools/delete", None)).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("tools/delete"));
    }

    #[tokio::test]
    async fn prompt_and_resource_lookups_validate_names() {
        let server = server_with(MockRideApi::returning(json!({})));

        let ok = server
            .handle_request(request("prompts/get", Some(json!({"name": "book_a_ride"}))))
            .await;
        assert!(ok.result.is_some());

        let bad = server
            .handle_request(request("prompts/get", Some(json!({"name": "nope"}))))
            .await;
        assert_eq!(bad.error.unwrap().code, INVALID_PARAMS);

        let unknown_uri = server
            .handle_request(request(
                "resources/read",
                Some(json!({"uri": "ui://widget/missing.html"})),
            ))
            .await;
        assert_eq!(unknown_uri.error.unwrap().code, INVALID_PARAMS);
    }
}
