//! Per-connection signaling session lifecycle.
//!
//! A session owns one WebSocket from handshake to cleanup: register the
//! connection in the room named by the request path, relay every received
//! text frame to the rest of the room, and unregister on the way out.

use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::broadcast::broadcast;
use crate::error::SessionEnd;
use crate::handler::AppState;
use crate::state::{RoomId, RoomMember};

/// `GET /ws/{room_id}` - upgrade to the signaling channel for a room.
///
/// The room identifier is the path segment, verbatim; it is never
/// renegotiated for the life of the connection. A failed handshake never
/// touches the registry.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, RoomId(room_id), state))
}

async fn run_session(socket: WebSocket, room: RoomId, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let member = RoomMember::new(tx);
    let connection = member.id();

    // Single writer per connection: broadcasts enqueue, this task is the
    // only thing touching the sink, so per-sender order is preserved. It
    // ends once every sender clone is dropped or the socket rejects a write.
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    state.registry.join(&room, member);
    info!(%room, %connection, "websocket connected");

    let end = loop {
        match next_text(&mut stream).await {
            Ok(text) => {
                debug!(%room, %connection, bytes = text.len(), "relaying message");
                broadcast(&state.registry, &room, text.as_str(), connection);
            }
            Err(end) => break end,
        }
    };

    // Runs on every exit from the receive loop. Idempotent even when the
    // broadcast engine already evicted this connection.
    state.registry.leave(&room, connection);
    match end {
        SessionEnd::Closed => info!(%room, %connection, "websocket disconnected"),
        end => warn!(%room, %connection, error = %end, "session terminated"),
    }
}

/// Wait for the next text frame, skipping transport keepalives.
async fn next_text(stream: &mut SplitStream<WebSocket>) -> Result<Utf8Bytes, SessionEnd> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text),
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(Message::Binary(_))) => return Err(SessionEnd::UnsupportedFrame),
            Some(Ok(Message::Close(_))) | None => return Err(SessionEnd::Closed),
            Some(Err(err)) => return Err(SessionEnd::Transport(err)),
        }
    }
}
