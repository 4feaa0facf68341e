use crate::error::DeliveryError;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_core::{ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::error;

/// Outbound queues of every live WebSocket, keyed by connection.
///
/// Each connection has a single unbounded queue drained by its writer task,
/// so messages to one target keep the order they were queued in.
#[derive(Clone, Default)]
pub struct ConnectionHub {
    peers: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<Message>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(conn_id, tx);
    }

    pub fn unregister(&self, conn_id: &ConnectionId) {
        self.peers.remove(conn_id);
    }

    pub fn is_connected(&self, conn_id: &ConnectionId) -> bool {
        self.peers.contains_key(conn_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[async_trait]
impl SignalingOutput for ConnectionHub {
    async fn send_to(
        &self,
        conn_id: &ConnectionId,
        msg: ServerMessage,
    ) -> Result<(), DeliveryError> {
        let Some(peer) = self.peers.get(conn_id) else {
            return Err(DeliveryError::Unaddressable(*conn_id));
        };

        let json = msg.encode().map_err(|e| {
            error!("Failed to serialize signal message: {}", e);
            DeliveryError::Encode(e)
        })?;

        peer.send(Message::Text(json.into()))
            .map_err(|_| DeliveryError::ChannelClosed(*conn_id))
    }
}
