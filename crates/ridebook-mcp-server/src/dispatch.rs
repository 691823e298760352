//! Tool dispatch: validates the tool name, issues exactly one backend
//! call, and wraps the outcome in the protocol's result envelope.
//!
//! No failure escapes this boundary. Unknown tools, bad arguments, and
//! backend errors all become error-flagged results carrying
//! `{error, code: "tool_execution_error"}`; the protocol call itself
//! always succeeds at the transport level.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use ridebook_backend::{BackendClient, BackendError, CreateTripRequest, EstimatesRequest, GuestInfo};

use crate::registry::{self, ToolCatalog};
use crate::resources;

pub const ERROR_CODE: &str = "tool_execution_error";

/// Seam over the backend client so the dispatcher can be exercised
/// without a network.
#[async_trait]
pub trait RideApi: Send + Sync {
    async fn get_estimates(&self, req: &EstimatesRequest) -> Result<Value, BackendError>;
    async fn create_trip(&self, req: &CreateTripRequest) -> Result<Value, BackendError>;
    async fn trip_details(&self, request_id: &str) -> Result<Value, BackendError>;
}

#[async_trait]
impl RideApi for BackendClient {
    async fn get_estimates(&self, req: &EstimatesRequest) -> Result<Value, BackendError> {
        BackendClient::get_estimates(self, req).await
    }

    async fn create_trip(&self, req: &CreateTripRequest) -> Result<Value, BackendError> {
        BackendClient::create_trip(self, req).await
    }

    async fn trip_details(&self, request_id: &str) -> Result<Value, BackendError> {
        BackendClient::trip_details(self, request_id).await
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ToolCallResult {
    fn text(text: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: false,
            meta: None,
        }
    }

    fn error(message: String) -> Self {
        let body = json!({ "error": message, "code": ERROR_CODE });
        Self {
            content: vec![ContentBlock::Text {
                text: body.to_string(),
            }],
            is_error: true,
            meta: None,
        }
    }

    fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({"content": [], "isError": true}))
    }
}

pub struct ToolDispatcher {
    api: Arc<dyn RideApi>,
    catalog: ToolCatalog,
    default_guest: Option<GuestInfo>,
}

impl ToolDispatcher {
    pub fn new(api: Arc<dyn RideApi>, default_guest: Option<GuestInfo>) -> Self {
        let catalog = ToolCatalog::new(default_guest.is_some());
        Self {
            api,
            catalog,
            default_guest,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolCallResult {
        match self.run(name, arguments).await {
            Ok(response) => {
                let result = ToolCallResult::text(render_json(&response));
                if name == registry::GET_RIDE_ESTIMATES {
                    result.with_meta(json!({ "widget_uri": resources::WIDGET_URI }))
                } else {
                    result
                }
            }
            Err(message) => {
                tracing::debug!(tool = name, error = %message, "tool call failed");
                ToolCallResult::error(message)
            }
        }
    }

    async fn run(&self, name: &str, arguments: Value) -> Result<Value, String> {
        match name {
            registry::GET_RIDE_ESTIMATES => {
                let req: EstimatesRequest = serde_json::from_value(arguments)
                    .map_err(|e| format!("invalid arguments: {e}"))?;
                self.api.get_estimates(&req).await.map_err(|e| e.to_string())
            }
            registry::CREATE_RIDE_REQUEST => {
                let req = self.trip_request(arguments)?;
                self.api.create_trip(&req).await.map_err(|e| e.to_string())
            }
            registry::GET_RIDE_DETAILS => {
                let request_id = arguments
                    .get("request_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| "request_id is required".to_string())?;
                self.api
                    .trip_details(request_id)
                    .await
                    .map_err(|e| e.to_string())
            }
            other => Err(format!("Unknown tool: {other}")),
        }
    }

    /// Fill in the configured default guest when the caller omitted one,
    /// then parse the trip request.
    fn trip_request(&self, mut arguments: Value) -> Result<CreateTripRequest, String> {
        if arguments.get("guest").is_none() {
            if let Some(default_guest) = &self.default_guest {
                let guest = serde_json::to_value(default_guest)
                    .map_err(|e| format!("invalid default guest: {e}"))?;
                if let Some(obj) = arguments.as_object_mut() {
                    obj.insert("guest".to_string(), guest);
                }
            }
        }
        serde_json::from_value(arguments).map_err(|e| format!("invalid arguments: {e}"))
    }
}

const MAX_RENDER_DEPTH: usize = 64;
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Pretty-print a JSON value for a text content block, substituting a
/// fixed marker past a nesting limit so pathological structures never
/// fail the whole serialization.
pub fn render_json(value: &Value) -> String {
    let clamped = clamp_depth(value, 0);
    serde_json::to_string_pretty(&clamped).unwrap_or_else(|_| CIRCULAR_MARKER.to_string())
}

fn clamp_depth(value: &Value, depth: usize) -> Value {
    if depth >= MAX_RENDER_DEPTH {
        return Value::String(CIRCULAR_MARKER.to_string());
    }
    match value {
        Value::Array(items) => Value::Array(
            items.iter().map(|v| clamp_depth(v, depth + 1)).collect(),
        ),
        Value::Object(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k.clone(), clamp_depth(v, depth + 1));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}
