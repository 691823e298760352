use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{CreateTripRequest, EstimatesRequest};

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status. The message is taken
    /// from the `message` field of the JSON error body when one exists.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Thin client over the guest trips API.
///
/// One attempt per call; no retries and no caching. Failures surface
/// immediately to the dispatcher, which turns them into error-flagged
/// tool results.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_estimates(&self, req: &EstimatesRequest) -> Result<Value, BackendError> {
        self.post("/guests/trips/estimates", req).await
    }

    pub async fn create_trip(&self, req: &CreateTripRequest) -> Result<Value, BackendError> {
        self.post("/guests/trips", req).await
    }

    pub async fn trip_details(&self, request_id: &str) -> Result<Value, BackendError> {
        let response = self
            .http
            .get(format!("{}/guests/trips/{}", self.base_url, request_id))
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Value, BackendError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("API request failed with status {}", status.as_u16())
                });
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}
