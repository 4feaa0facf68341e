use huddle_core::RoomId;
use std::net::{Ipv4Addr, SocketAddr};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to.
    pub bind: SocketAddr,
    /// Room joined by connections that arrive on `/ws` without naming one.
    pub default_room: RoomId,
    /// Send `delivery-failed` back to a sender whose target is gone.
    pub delivery_receipts: bool,
    /// Buffer size of the membership event channel.
    pub event_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
            default_room: RoomId::from("1"),
            delivery_receipts: false,
            event_capacity: 256,
        }
    }
}
