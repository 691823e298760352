//! End-to-end protocol flow against a mocked backend: initialize, list
//! tools, call each tool, and check error normalization.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ridebook_backend::BackendClient;
use ridebook_mcp_server::dispatch::ToolDispatcher;
use ridebook_mcp_server::rpc::{JsonRpcRequest, McpServer};

const RIDE_ID: &str = "f3a604eb-8b90-4068-932c-13d6a5002f86";

fn mcp_server(backend_url: &str) -> McpServer {
    let client = BackendClient::new(backend_url);
    McpServer::new(
        ToolDispatcher::new(Arc::new(client), None),
        "http://localhost:3000",
    )
}

fn request(id: u64, method: &str, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: method.to_string(),
        params,
    }
}

fn tool_call(id: u64, name: &str, arguments: Value) -> JsonRpcRequest {
    request(
        id,
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    )
}

fn content_text(result: &Value) -> Value {
    let text = result["content"][0]["text"].as_str().expect("text block");
    serde_json::from_str(text).expect("content is JSON")
}

#[tokio::test]
async fn full_session_flow_against_the_backend() {
    let backend = MockServer::start().await;

    let estimates = json!({
        "etas_unavailable": false,
        "product_estimates": [
            {"product": {"display_name": "Standard", "product_id": "b8e5c464"}}
        ],
    });
    Mock::given(method("POST"))
        .and(path("/guests/trips/estimates"))
        .and(body_json(json!({
            "pickup": {"latitude": 40.758, "longitude": -73.9855},
            "dropoff": {"latitude": 40.7489, "longitude": -73.968},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(estimates.clone()))
        .expect(1)
        .mount(&backend)
        .await;

    let trip = json!({
        "request_id": RIDE_ID,
        "status": "accepted",
        "driver": {"name": "Joe", "rating": 4.9},
        "vehicle": {"make": "Oldsmobile", "model": "Intrigue"},
    });
    Mock::given(method("GET"))
        .and(path(format!("/guests/trips/{RIDE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(trip.clone()))
        .expect(1)
        .mount(&backend)
        .await;

    let server = mcp_server(&backend.uri());

    let init = server.handle_request(request(1, "initialize", None)).await;
    assert_eq!(init.result.unwrap()["serverInfo"]["name"], "ridebook-mcp");

    let tools = server.handle_request(request(2, "tools/list", None)).await;
    let listed = tools.result.unwrap();
    assert_eq!(listed["tools"].as_array().unwrap().len(), 3);

    let estimates_result = server
        .handle_request(tool_call(
            3,
            "get_ride_estimates",
            json!({
                "pickup": {"latitude": 40.758, "longitude": -73.9855},
                "dropoff": {"latitude": 40.7489, "longitude": -73.968},
            }),
        ))
        .await;
    let result = estimates_result.result.unwrap();
    assert!(result.get("isError").is_none());
    assert_eq!(result["content"].as_array().unwrap().len(), 1);
    assert_eq!(content_text(&result), estimates);

    let details = server
        .handle_request(tool_call(4, "get_ride_details", json!({"request_id": RIDE_ID})))
        .await;
    let result = details.result.unwrap();
    assert!(result.get("isError").is_none());
    let record = content_text(&result);
    assert_eq!(record["status"], "accepted");
    assert_eq!(record, trip);
}

#[tokio::test]
async fn backend_rejection_surfaces_as_an_error_result_not_a_fault() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/guests/trips"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Product ID is required",
            "code": "invalid_request_parameters",
        })))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/guests/trips/estimates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product_estimates": []})))
        .mount(&backend)
        .await;

    let server = mcp_server(&backend.uri());

    let response = server
        .handle_request(tool_call(
            1,
            "create_ride_request",
            json!({
                "guest": {
                    "first_name": "John",
                    "last_name": "Doe",
                    "phone_number": "+12125551234",
                },
                "pickup": {"latitude": 40.758, "longitude": -73.9855},
                "dropoff": {"latitude": 40.7489, "longitude": -73.968},
                "product_id": "b8e5c464",
            }),
        ))
        .await;

    // The protocol call succeeds; the error travels inside the envelope.
    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    let body = content_text(&result);
    assert_eq!(body["error"], "Product ID is required");
    assert_eq!(body["code"], "tool_execution_error");

    // The session stays usable after a failed call.
    let follow_up = server
        .handle_request(tool_call(
            2,
            "get_ride_estimates",
            json!({
                "pickup": {"latitude": 40.758, "longitude": -73.9855},
                "dropoff": {"latitude": 40.7489, "longitude": -73.968},
            }),
        ))
        .await;
    let result = follow_up.result.unwrap();
    assert!(result.get("isError").is_none());
}

#[tokio::test]
async fn unknown_tool_never_reaches_the_backend() {
    // No mocks mounted: any backend request would panic the mock server
    // expectations below.
    let backend = MockServer::start().await;
    let server = mcp_server(&backend.uri());

    let response = server
        .handle_request(tool_call(1, "cancel_ride", json!({})))
        .await;
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(content_text(&result)["code"], "tool_execution_error");

    assert_eq!(backend.received_requests().await.unwrap().len(), 0);
}
