use huddle_core::{CodecError, ConnectionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection {0} is not addressable")]
    Unaddressable(ConnectionId),

    #[error("outbound channel of {0} is closed")]
    ChannelClosed(ConnectionId),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a client message was not forwarded. Never reported back to the sender.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("malformed message: {0}")]
    Malformed(#[from] CodecError),

    #[error("connection {0} addressed itself")]
    SelfAddressed(ConnectionId),

    #[error("could not deliver to {target}: {source}")]
    Undelivered {
        target: ConnectionId,
        #[source]
        source: DeliveryError,
    },
}
