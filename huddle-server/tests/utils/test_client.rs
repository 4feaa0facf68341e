use anyhow::{Context, Result, bail};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::{SIGNAL_TIMEOUT_MS, SILENCE_MS};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client speaking the signaling protocol against a running server.
pub struct TestClient {
    /// Identifier the server assigned in its welcome.
    pub id: ConnectionId,
    /// Room the server placed this client in.
    pub room: RoomId,
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

impl TestClient {
    /// Connects to `/ws` (or `/ws/{room}`) and waits for the welcome.
    pub async fn connect(addr: SocketAddr, room: Option<&str>) -> Result<Self> {
        let url = match room {
            Some(room) => format!("ws://{addr}/ws/{room}"),
            None => format!("ws://{addr}/ws"),
        };
        let (stream, _) = connect_async(url)
            .await
            .context("Failed to open WebSocket")?;
        let (write, mut read) = stream.split();

        let welcome = next_message(&mut read, SIGNAL_TIMEOUT_MS).await?;
        let ServerMessage::Welcome(welcome) = welcome else {
            bail!("Expected welcome, got {:?}", welcome);
        };
        tracing::debug!("[TestClient] Connected as {}", welcome.connection_id);

        Ok(Self {
            id: welcome.connection_id,
            room: welcome.room,
            write,
            read,
        })
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        self.send_raw(&msg.encode()?).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.write
            .send(Message::Text(text.to_string().into()))
            .await
            .context("Failed to send frame")
    }

    pub async fn recv(&mut self) -> Result<ServerMessage> {
        next_message(&mut self.read, SIGNAL_TIMEOUT_MS).await
    }

    /// Returns the raw text of the next frame, for byte-level assertions.
    pub async fn recv_text(&mut self) -> Result<String> {
        next_text(&mut self.read, SIGNAL_TIMEOUT_MS).await
    }

    /// True if nothing arrives within a short window.
    pub async fn is_silent(&mut self) -> bool {
        next_text(&mut self.read, SILENCE_MS).await.is_err()
    }

    pub async fn close(mut self) -> Result<()> {
        self.write
            .send(Message::Close(None))
            .await
            .context("Failed to close")
    }
}

async fn next_message(read: &mut SplitStream<WsStream>, timeout_ms: u64) -> Result<ServerMessage> {
    let text = next_text(read, timeout_ms).await?;
    ServerMessage::decode(&text).with_context(|| format!("Undecodable frame: {text}"))
}

async fn next_text(read: &mut SplitStream<WsStream>, timeout_ms: u64) -> Result<String> {
    let deadline = Duration::from_millis(timeout_ms);

    tokio::time::timeout(deadline, async {
        loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_string()),
                Some(Ok(Message::Close(_))) | None => bail!("Socket closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => bail!("Socket error: {e}"),
            }
        }
    })
    .await
    .context("Timeout waiting for message")?
}
