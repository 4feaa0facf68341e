use crate::server::AppState;
use crate::signaling::SignalingOutput;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ConnectionId, RoomId, ServerMessage, Welcome};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// `GET /ws`: joins the configured default room.
pub async fn ws_default_room(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let room = state.default_room.clone();

    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

/// `GET /ws/{room}`
pub async fn ws_named_room(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let room = RoomId::from(room);

    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

async fn handle_socket(socket: WebSocket, room: RoomId, state: AppState) {
    let conn_id = ConnectionId::new();
    info!("New WebSocket connection {} for room '{}'", conn_id, room);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.hub.register(conn_id, tx);

    let welcome = ServerMessage::Welcome(Welcome {
        connection_id: conn_id,
        room: room.clone(),
    });
    if let Err(e) = state.hub.send_to(&conn_id, welcome).await {
        error!("Failed to greet {}: {}", conn_id, e);
    }

    state.router.on_connect(conn_id, &room).await;

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let router = state.router.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        if let Err(e) = router.on_message(conn_id, text.as_str()).await {
                            debug!("Message from {} not forwarded: {}", conn_id, e);
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.hub.unregister(&conn_id);
    state.router.on_disconnect(conn_id).await;
    info!("WebSocket disconnected: {}", conn_id);
}
