use crate::error::CodecError;
use crate::model::{ConnectionId, EphemeralId, Payload, RoomId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// Client -> server bodies.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    pub offer: Payload,
    pub target_id: ConnectionId,
    pub ephemeral_id: EphemeralId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub answer: Payload,
    pub target_id: ConnectionId,
    pub ephemeral_id: EphemeralId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRequest {
    pub target_id: ConnectionId,
    pub candidate: Payload,
}

// Server -> client bodies.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub connection_id: ConnectionId,
    pub room: RoomId,
}

/// Members already present in the room, never including the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceList {
    pub peers: Vec<ConnectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationRequested {
    pub from_id: ConnectionId,
    pub offer: Payload,
    pub ephemeral_id: EphemeralId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationComplete {
    pub from_id: ConnectionId,
    pub answer: Payload,
    pub ephemeral_id: EphemeralId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReceived {
    pub from_id: ConnectionId,
    pub candidate: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerDeparted {
    pub peer_id: ConnectionId,
}

/// Receipt for a forward that could not be delivered. Only sent when receipts are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailed {
    pub target_id: ConnectionId,
    pub op: String,
}

/// Messages a client sends to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientMessage {
    SendOffer(OfferRequest),
    SendAnswer(AnswerRequest),
    SendCandidate(CandidateRequest),
}

/// Messages the coordinator sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome(Welcome),
    PresenceList(PresenceList),
    NegotiationRequested(NegotiationRequested),
    NegotiationComplete(NegotiationComplete),
    CandidateReceived(CandidateReceived),
    PeerDeparted(PeerDeparted),
    DeliveryFailed(DeliveryFailed),
}

// Frames are decoded in two steps so that the `d` body reaches the typed struct straight
// from the source text. Payload fields rely on this to keep their raw bytes.
#[derive(Deserialize)]
struct Envelope {
    op: String,
    #[serde(default)]
    d: Option<Box<RawValue>>,
}

fn body<T: DeserializeOwned>(op: &str, d: Option<Box<RawValue>>) -> Result<T, CodecError> {
    let d = d.ok_or_else(|| CodecError::MissingBody(op.to_string()))?;
    Ok(serde_json::from_str(d.get())?)
}

impl ClientMessage {
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        let Envelope { op, d } = serde_json::from_str(text)?;
        match op.as_str() {
            "send-offer" => Ok(Self::SendOffer(body(&op, d)?)),
            "send-answer" => Ok(Self::SendAnswer(body(&op, d)?)),
            "send-candidate" => Ok(Self::SendCandidate(body(&op, d)?)),
            _ => Err(CodecError::UnknownOp(op)),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::SendOffer(_) => "send-offer",
            Self::SendAnswer(_) => "send-answer",
            Self::SendCandidate(_) => "send-candidate",
        }
    }

    pub fn target_id(&self) -> ConnectionId {
        match self {
            Self::SendOffer(m) => m.target_id,
            Self::SendAnswer(m) => m.target_id,
            Self::SendCandidate(m) => m.target_id,
        }
    }
}

impl ServerMessage {
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        let Envelope { op, d } = serde_json::from_str(text)?;
        match op.as_str() {
            "welcome" => Ok(Self::Welcome(body(&op, d)?)),
            "presence-list" => Ok(Self::PresenceList(body(&op, d)?)),
            "negotiation-requested" => Ok(Self::NegotiationRequested(body(&op, d)?)),
            "negotiation-complete" => Ok(Self::NegotiationComplete(body(&op, d)?)),
            "candidate-received" => Ok(Self::CandidateReceived(body(&op, d)?)),
            "peer-departed" => Ok(Self::PeerDeparted(body(&op, d)?)),
            "delivery-failed" => Ok(Self::DeliveryFailed(body(&op, d)?)),
            _ => Err(CodecError::UnknownOp(op)),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
