//! Test doubles shared by unit and integration tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

use ridebook_backend::{BackendError, CreateTripRequest, EstimatesRequest};

use crate::dispatch::RideApi;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub payload: Value,
}

/// Recording stand-in for the backend client. Returns a canned value or
/// fails every call with a fixed message.
pub struct MockRideApi {
    response: Value,
    fail_with: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRideApi {
    pub fn returning(response: Value) -> Self {
        Self {
            response,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Value::Null,
            fail_with: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, operation: &'static str, payload: Value) -> Result<Value, BackendError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(RecordedCall { operation, payload });
        match &self.fail_with {
            Some(message) => Err(BackendError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}

#[async_trait]
impl RideApi for MockRideApi {
    async fn get_estimates(&self, req: &EstimatesRequest) -> Result<Value, BackendError> {
        let payload = serde_json::to_value(req).unwrap_or(Value::Null);
        self.record("get_estimates", payload)
    }

    async fn create_trip(&self, req: &CreateTripRequest) -> Result<Value, BackendError> {
        let payload = serde_json::to_value(req).unwrap_or(Value::Null);
        self.record("create_trip", payload)
    }

    async fn trip_details(&self, request_id: &str) -> Result<Value, BackendError> {
        self.record("trip_details", json!(request_id))
    }
}
