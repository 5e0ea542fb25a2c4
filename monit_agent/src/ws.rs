//! WebSocket endpoint: gate the upgrade, then bridge the socket to a session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::gatekeeper::Identity;
use crate::session::{Key, SessionEvent, Viewport};
use crate::state::AppState;
use crate::types::ClientMessage;

pub fn router(state: AppState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let credential = bearer(&headers).or_else(|| q.get("key").map(String::as_str));
    let identity = match state.gatekeeper.admit(credential) {
        Ok(id) => id,
        Err(_) => return StatusCode::UNAUTHORIZED.into_response(),
    };
    let viewport = viewport_from_query(&q);
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity, viewport))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn viewport_from_query(q: &HashMap<String, String>) -> Viewport {
    let default = Viewport::default();
    let dim = |k: &str, d: u16| q.get(k).and_then(|v| v.parse().ok()).unwrap_or(d);
    Viewport {
        width: dim("cols", default.width),
        height: dim("rows", default.height),
    }
}

/// Translate one client frame; unknown keys and malformed frames yield `None`.
pub fn parse_client_message(text: &str) -> Option<SessionEvent> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Resize { width, height }) => {
            Some(SessionEvent::Resized(Viewport { width, height }))
        }
        Ok(ClientMessage::Key { key }) => Key::parse(&key).map(SessionEvent::KeyPressed),
        Err(e) => {
            debug!("ignoring malformed client frame: {e}");
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, identity: Identity, viewport: Viewport) {
    let (mut sink, mut stream) = socket.split();
    let (ev_tx, ev_rx) = mpsc::channel(32);
    let (view_tx, mut view_rx) = watch::channel(None);

    // Dropping the handle on any exit path tears the session down.
    let session = state.supervisor.spawn(identity, viewport, ev_rx, view_tx);
    let mut quit = false;

    loop {
        tokio::select! {
            changed = view_rx.changed() => match changed {
                Ok(()) => {
                    // Only the newest view is sent; older unsent ones are gone.
                    let latest = view_rx.borrow_and_update().clone();
                    let Some(v) = latest else { continue };
                    let js = match serde_json::to_string(&v) {
                        Ok(js) => js,
                        Err(e) => {
                            warn!("view serialization failed: {e}");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(js)).await.is_err() {
                        break;
                    }
                }
                // Session quit: close the connection from our side.
                Err(_) => {
                    let _ = sink.send(Message::Close(None)).await;
                    quit = true;
                    break;
                }
            },
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Some(ev) = parse_client_message(&text) {
                        if ev_tx.send(ev).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    let _ = ev_tx.try_send(SessionEvent::Disconnected);
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    if quit {
        let _ = session.join().await;
    }
}
