use crate::error::DeliveryError;
use async_trait::async_trait;
use huddle_core::{ConnectionId, ServerMessage};

/// Addressed delivery to one connection, implemented by the transport.
///
/// Delivery is fire-and-forget: `Ok` means the message was queued for the
/// connection, not that the client received it.
///
/// `send_to` is called while the membership lock is held (presence lists and
/// departure notices), so it must only enqueue and never wait on the network
/// or on a full buffer. A slow implementation stalls membership changes in every room.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_to(&self, conn_id: &ConnectionId, msg: ServerMessage)
    -> Result<(), DeliveryError>;
}
