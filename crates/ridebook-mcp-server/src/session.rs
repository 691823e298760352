//! Session bookkeeping for the SSE transport.
//!
//! One session per connected client: its own protocol server, its own
//! outbound frame channel, one uuid. The store is the only state shared
//! across sessions; everything in it is guarded by a `tokio::sync::RwLock`.
//!
//! Teardown invariants: a handle is removed from the map before its
//! resources go away, and the teardown sequence runs at most once per
//! session even when close signals race (client disconnect vs explicit
//! close).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::rpc::McpServer;

const OUTBOUND_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session stream closed")]
    StreamClosed,
}

pub struct SessionHandle {
    id: String,
    server: McpServer,
    outbound: mpsc::Sender<String>,
    closed: Arc<AtomicBool>,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn server(&self) -> &McpServer {
        &self.server
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Queue a formatted SSE frame on this session's stream. Fails (and
    /// the caller discards the frame) once the client is gone.
    pub async fn send_frame(&self, frame: String) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::StreamClosed);
        }
        self.outbound
            .send(frame)
            .await
            .map_err(|_| SessionError::StreamClosed)
    }
}

/// Registry of live sessions, keyed by session id. Explicitly owned and
/// injected into the HTTP handlers rather than held as process-wide
/// state.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh session around the given protocol server.
    /// Returns the handle and the receiving end of its frame channel.
    pub async fn open(&self, server: McpServer) -> (Arc<SessionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let handle = Arc::new(SessionHandle {
            id: Uuid::new_v4().to_string(),
            server,
            outbound: tx,
            closed: Arc::new(AtomicBool::new(false)),
        });

        let mut sessions = self.sessions.write().await;
        sessions.insert(handle.id.clone(), handle.clone());
        tracing::info!(session_id = %handle.id, open = sessions.len(), "session opened");
        (handle, rx)
    }

    pub async fn get(&self, session_id: &str) -> Result<Arc<SessionHandle>, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Tear a session down. Returns true if this call performed the
    /// teardown; closing an unknown or already-closed session is a
    /// no-op.
    pub async fn close(&self, session_id: &str) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(session_id)
        };
        match removed {
            Some(handle) => {
                if handle.closed.swap(true, Ordering::SeqCst) {
                    return false;
                }
                tracing::info!(session_id, "session closed");
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
