//! MCP bridge for the ride-booking guest trips API.
//!
//! Exposes three tools (`get_ride_estimates`, `create_ride_request`,
//! `get_ride_details`) over the model context protocol. Each invocation
//! maps to exactly one HTTP call against the configured backend; the
//! backend's JSON comes back verbatim as a single text content block.
//!
//! Two transports:
//! - stdio: line-delimited JSON-RPC on stdin/stdout, one process = one
//!   session (`stdio` subcommand, the default);
//! - SSE: `GET /sse` opens a server-push stream per client, paired with
//!   `POST /message?sessionId=<id>` for client-to-server messages
//!   (`sse` subcommand). Sessions are tracked in an injectable
//!   [`session::SessionStore`].

pub mod config;
pub mod dispatch;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod rpc;
pub mod schema;
pub mod session;
pub mod sse;
pub mod stdio;
pub mod testing;

pub use config::ServerConfig;
pub use dispatch::{RideApi, ToolCallResult, ToolDispatcher};
pub use registry::ToolCatalog;
pub use rpc::McpServer;
pub use session::SessionStore;
