//! HTTP SSE transport.
//!
//! `GET /sse` opens one server-push stream per client: a fresh protocol
//! server is built, the session is registered, and the first frame is an
//! `endpoint` event naming the paired message path. `POST
//! /message?sessionId=<id>` carries client-to-server JSON-RPC; responses
//! are queued on that session's stream and the POST itself answers 202.
//! Dropping the stream (client disconnect) tears the session down.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use futures::Stream;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::rpc::{JsonRpcRequest, McpServer};
use crate::session::SessionStore;

pub struct AppState {
    pub store: Arc<SessionStore>,
    pub config: ServerConfig,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    serve_with_store(config, Arc::new(SessionStore::new())).await
}

pub async fn serve_with_store(config: ServerConfig, store: Arc<SessionStore>) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    info!(addr = %addr, "ridebook-mcp SSE server listening");

    let state = web::Data::new(AppState { store, config });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(routes)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {addr}"))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sse", web::get().to(open_stream))
        .route("/message", web::post().to(post_message))
        .default_service(web::route().to(not_found));
}

fn sse_frame(event: &str, data: &str) -> String {
    format!("event: {event}\ndata: {data}\n\n")
}

async fn open_stream(state: web::Data<AppState>) -> HttpResponse {
    let server = McpServer::from_config(&state.config);
    let (handle, rx) = state.store.open(server).await;

    let endpoint = format!("/message?sessionId={}", handle.id());
    if handle
        .send_frame(sse_frame("endpoint", &endpoint))
        .await
        .is_err()
    {
        // Handshake failed before the stream ever reached the client.
        state.store.close(handle.id()).await;
        return HttpResponse::InternalServerError().body("failed to open session stream");
    }

    let stream = SessionStream {
        rx: ReceiverStream::new(rx),
        _close: CloseOnDrop {
            store: state.store.clone(),
            session_id: handle.id().to_string(),
        },
    };

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("cache-control", "no-cache"))
        .streaming(stream)
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn post_message(
    state: web::Data<AppState>,
    query: web::Query<MessageQuery>,
    body: web::Json<JsonRpcRequest>,
) -> HttpResponse {
    let Some(session_id) = &query.session_id else {
        return HttpResponse::BadRequest().body("Missing sessionId query parameter");
    };

    let session = match state.store.get(session_id).await {
        Ok(session) => session,
        Err(_) => return HttpResponse::NotFound().body("Session not found"),
    };

    let response = session.server().handle_request(body.into_inner()).await;
    if response.should_send() {
        let payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(e) => {
                return HttpResponse::InternalServerError()
                    .body(format!("failed to serialize response: {e}"));
            }
        };
        if session
            .send_frame(sse_frame("message", &payload))
            .await
            .is_err()
        {
            // Client went away while the call was in flight; the result
            // is discarded rather than crashing the request.
            debug!(session_id = %session.id(), "dropping response for closed session");
        }
    }

    HttpResponse::Accepted().body("Accepted")
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body("Not Found")
}

struct SessionStream {
    rx: ReceiverStream<String>,
    _close: CloseOnDrop,
}

impl Stream for SessionStream {
    type Item = Result<web::Bytes, actix_web::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.rx).poll_next(cx) {
            Poll::Ready(Some(frame)) => Poll::Ready(Some(Ok(web::Bytes::from(frame)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Unregisters the session when the response stream is dropped, however
/// that happens (client disconnect, transport error, server shutdown).
struct CloseOnDrop {
    store: Arc<SessionStore>,
    session_id: String,
}

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        let store = self.store.clone();
        let session_id = std::mem::take(&mut self.session_id);
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            rt.spawn(async move {
                store.close(&session_id).await;
            });
        }
    }
}
