//! SSE transport implementation - the multi-client session bridge.
//!
//! Each client opens a streaming connection on `GET /sse` and receives a
//! server-generated session id in the initial `endpoint` event. Subsequent
//! JSON-RPC messages are POSTed to `/messages?sessionId=<id>` and routed to
//! that session's MCP service instance; server-to-client messages flow back
//! over the SSE stream. Closing the connection tears the session down and
//! invalidates its id.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    routing::{get, post},
};
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt, stream};
use rmcp::ServiceExt;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::{SseConfig, TransportError, TransportResult};
use crate::core::McpServer;

/// Buffered messages per session, in each direction.
const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Live sessions: session id to the sender feeding that session's service.
type SessionMap = Arc<RwLock<HashMap<String, mpsc::Sender<ClientJsonRpcMessage>>>>;

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    /// The MCP server instance; cloned once per session.
    server: McpServer,
    /// Session routing table.
    sessions: SessionMap,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the SSE transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let state = AppState {
            server,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        };
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {}", addr);
        info!("  -> Events:   GET  /sse");
        info!("  -> Messages: POST /messages?sessionId=<id>");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the transport's router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/sse", get(handle_sse))
        .route("/messages", post(handle_message))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Removes the session from the routing table when the SSE stream drops,
/// whether the client disconnected or the service shut down. Removal is
/// idempotent; a session that is already gone is a no-op.
struct SessionGuard {
    id: String,
    sessions: SessionMap,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = std::mem::take(&mut self.id);
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            if sessions.write().await.remove(&id).is_some() {
                info!("SSE session closed: {}", id);
            }
        });
    }
}

/// Handle a new streaming connection: issue a session id, register it, and
/// bind a fresh MCP service instance to the channel pair.
#[instrument(skip_all)]
async fn handle_sse(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = uuid::Uuid::new_v4().simple().to_string();

    let (client_tx, client_rx) = mpsc::channel::<ClientJsonRpcMessage>(SESSION_CHANNEL_CAPACITY);
    let (server_tx, server_rx) = mpsc::channel::<ServerJsonRpcMessage>(SESSION_CHANNEL_CAPACITY);

    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), client_tx);
    info!("SSE session opened: {}", session_id);

    let server = state.server.clone();
    let serve_session = session_id.clone();
    tokio::spawn(async move {
        // The service lives until the inbound stream ends, which happens
        // when the session is deregistered and its sender dropped.
        match server.serve((server_tx, client_rx)).await {
            Ok(service) => {
                let _ = service.waiting().await;
            }
            Err(e) => warn!("Session {} failed to initialize: {}", serve_session, e),
        }
    });

    let guard = SessionGuard {
        id: session_id.clone(),
        sessions: state.sessions.clone(),
    };

    let endpoint = format!("/messages?sessionId={session_id}");
    let events = stream::once(async move {
        Ok::<_, axum::Error>(Event::default().event("endpoint").data(endpoint))
    })
    .chain(server_rx.map(move |message| {
        // Keep the guard alive for as long as the stream itself.
        let _guard = &guard;
        serde_json::to_string(&message)
            .map(|data| Event::default().event("message").data(data))
            .map_err(axum::Error::new)
    }));

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Route a POSTed JSON-RPC message to its session.
///
/// An unknown or already-closed session id is rejected with a client error
/// before the message gets anywhere near the dispatch engine.
#[instrument(skip(state, message))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(message): Json<ClientJsonRpcMessage>,
) -> impl IntoResponse {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId").into_response();
    };

    let sender = state.sessions.read().await.get(&session_id).cloned();
    match sender {
        Some(mut tx) => match tx.send(message).await {
            Ok(()) => StatusCode::ACCEPTED.into_response(),
            // The session closed between lookup and send.
            Err(_) => no_session_response(&session_id),
        },
        None => no_session_response(&session_id),
    }
}

fn no_session_response(session_id: &str) -> axum::response::Response {
    warn!("No transport found for sessionId: {}", session_id);
    (StatusCode::BAD_REQUEST, "No transport found for sessionId").into_response()
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::catalog::ToolCatalog;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt as _;

    fn test_state() -> AppState {
        let server = McpServer::new(Config::default(), ToolCatalog::builtin().unwrap()).unwrap();
        AppState {
            server,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn ping_body() -> Body {
        Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
    }

    #[tokio::test]
    async fn test_message_without_session_id_rejected() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::post("/messages")
                    .header("content-type", "application/json")
                    .body(ping_body())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::post("/messages?sessionId=doesnotexist")
                    .header("content-type", "application/json")
                    .body(ping_body())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_registered_session_accepts_message() {
        let state = test_state();
        let (tx, mut rx) = mpsc::channel(4);
        state.sessions.write().await.insert("abc".to_string(), tx);

        let app = router(state);
        let response = app
            .oneshot(
                Request::post("/messages?sessionId=abc")
                    .header("content-type", "application/json")
                    .body(ping_body())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(rx.next().await.is_some());
    }

    #[tokio::test]
    async fn test_closed_session_no_longer_routes() {
        let state = test_state();
        let (tx, _rx) = mpsc::channel(4);
        state.sessions.write().await.insert("gone".to_string(), tx);

        // Close the session; a second removal must be a harmless no-op.
        assert!(state.sessions.write().await.remove("gone").is_some());
        assert!(state.sessions.write().await.remove("gone").is_none());

        let app = router(state);
        let response = app
            .oneshot(
                Request::post("/messages?sessionId=gone")
                    .header("content-type", "application/json")
                    .body(ping_body())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
