//! Server-Sent Events transport
//!
//! `GET /sse` opens a stream whose first event (`endpoint`) names the URL to
//! POST messages to. Replies arrive on the stream as `message` events. Each
//! stream has one worker, so a client's messages are answered in the order
//! they were posted while other clients proceed independently.

use async_stream::stream;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::Stream;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::jsonrpc::error_response;
use crate::{McpError, McpResult, McpServer};

pub const SSE_PATH: &str = "/sse";
pub const MESSAGE_PATH: &str = "/message";

const SESSION_QUEUE: usize = 32;

type Sessions = Arc<Mutex<HashMap<String, mpsc::Sender<Bytes>>>>;

#[derive(Clone)]
struct TransportState {
    server: Arc<McpServer>,
    sessions: Sessions,
    closing: watch::Receiver<bool>,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Removes the session entry when its stream is dropped
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&self.id);
        }
        debug!(session = %self.id, "sse session closed");
    }
}

pub struct SseTransport {
    state: TransportState,
    close_tx: watch::Sender<bool>,
}

impl SseTransport {
    pub fn new(server: Arc<McpServer>) -> Self {
        let (close_tx, closing) = watch::channel(false);
        Self {
            state: TransportState { server, sessions: Arc::new(Mutex::new(HashMap::new())), closing },
            close_tx,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(SSE_PATH, get(sse_connect))
            .route(MESSAGE_PATH, post(post_message))
            .layer(cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// End every open event stream so graceful shutdown can complete
    pub fn close_streams(&self) {
        self.close_tx.send_replace(true);
    }

    pub fn session_count(&self) -> usize {
        self.state.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// Any origin with Content-Type and Accept-Encoding headers.
///
/// POST is allowed alongside GET, HEAD and OPTIONS so browser clients can
/// reach the message endpoint.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_ENCODING])
}

/// Serve the transport on `listener` until `shutdown` resolves
pub async fn serve_sse<F>(listener: TcpListener, transport: SseTransport, shutdown: F) -> McpResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = transport.router();
    if let Ok(addr) = listener.local_addr() {
        info!("MCP SSE server listening on http://{}{}", addr, SSE_PATH);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            transport.close_streams();
        })
        .await
        .map_err(McpError::Io)
}

async fn sse_connect(
    State(state): State<TransportState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let (request_tx, request_rx) = mpsc::channel::<Bytes>(SESSION_QUEUE);
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(SESSION_QUEUE);

    if let Ok(mut sessions) = state.sessions.lock() {
        sessions.insert(session_id.clone(), request_tx);
    }
    tokio::spawn(session_worker(state.server.clone(), request_rx, reply_tx));
    info!(session = %session_id, "sse session opened");

    let endpoint = format!("{}?sessionId={}", MESSAGE_PATH, session_id);
    let guard = SessionGuard { id: session_id, sessions: state.sessions.clone() };
    let mut closing = state.closing.clone();

    let events = stream! {
        let _guard = guard;
        yield Ok(Event::default().event("endpoint").data(endpoint));

        loop {
            if *closing.borrow() {
                break;
            }
            let next = tokio::select! {
                reply = reply_rx.recv() => reply,
                _ = closing.changed() => None,
            };
            match next {
                Some(reply) => yield Ok(Event::default().event("message").data(reply)),
                None => break,
            }
        }
    };

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Answers one session's messages strictly in arrival order
async fn session_worker(
    server: Arc<McpServer>,
    mut requests: mpsc::Receiver<Bytes>,
    replies: mpsc::Sender<String>,
) {
    while let Some(body) = requests.recv().await {
        let response = match server.process_message(&body).await {
            Ok(Some(response)) => response,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "rejected message");
                error_response(None, e.to_jsonrpc_error())
            }
        };
        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode response");
                continue;
            }
        };
        if replies.send(encoded).await.is_err() {
            break;
        }
    }
}

async fn post_message(
    State(state): State<TransportState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let sender = state.sessions.lock().ok().and_then(|s| s.get(&query.session_id).cloned());
    let Some(sender) = sender else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "MCP session not found"})),
        )
            .into_response();
    };

    if sender.send(body).await.is_err() {
        return (StatusCode::GONE, Json(serde_json::json!({"error": "MCP session closed"})))
            .into_response();
    }
    (StatusCode::ACCEPTED, "Accepted").into_response()
}
