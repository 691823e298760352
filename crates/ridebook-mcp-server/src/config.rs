//! Configuration from environment variables.
//!
//! **Environment variables:**
//! - `API_BASE_URL`: base URL of the guest trips API (default: http://localhost:3001/api)
//! - `PORT`: SSE listener port (default: 8000)
//! - `WIDGET_BASE_URL`: host serving widget bundles (default: http://localhost:3000)
//! - `RIDEBOOK_DEFAULT_GUEST`: optional JSON guest identity used when a
//!   caller omits `guest` on `create_ride_request`. When set, the tool
//!   schema no longer lists `guest` as required.

use ridebook_backend::GuestInfo;
use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_base_url: String,
    pub port: u16,
    pub widget_base_url: String,
    pub default_guest: Option<GuestInfo>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001/api".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            widget_base_url: env::var("WIDGET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_guest: parse_default_guest(env::var("RIDEBOOK_DEFAULT_GUEST").ok()),
        }
    }
}

impl ServerConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_default_guest(mut self, guest: Option<GuestInfo>) -> Self {
        self.default_guest = guest;
        self
    }
}

fn parse_default_guest(raw: Option<String>) -> Option<GuestInfo> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(guest) => Some(guest),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparseable RIDEBOOK_DEFAULT_GUEST");
            None
        }
    }
}
