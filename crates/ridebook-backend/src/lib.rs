//! Client for the upstream ride-booking guest trips API.
//!
//! The MCP bridge never reshapes backend payloads: responses come back as
//! raw `serde_json::Value` and are forwarded to the protocol client as-is.
//! This crate owns the HTTP plumbing and the backend error taxonomy.

pub mod client;
pub mod types;

pub use client::{BackendClient, BackendError};
pub use types::{Coordinates, CreateTripRequest, EstimatesRequest, GuestInfo};
