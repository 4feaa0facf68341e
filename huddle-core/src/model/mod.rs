mod connection;
mod ephemeral;
mod payload;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use ephemeral::EphemeralId;
pub use payload::Payload;
pub use room::RoomId;
pub use signaling::{
    AnswerRequest, CandidateReceived, CandidateRequest, ClientMessage, DeliveryFailed,
    NegotiationComplete, NegotiationRequested, OfferRequest, PeerDeparted, PresenceList,
    ServerMessage, Welcome,
};
