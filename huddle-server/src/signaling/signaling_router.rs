use crate::error::RouteError;
use crate::room::MembershipService;
use crate::signaling::SignalingOutput;
use huddle_core::{
    CandidateReceived, ClientMessage, ConnectionId, DeliveryFailed, NegotiationComplete,
    NegotiationRequested, PeerDeparted, PresenceList, RoomId, ServerMessage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Protocol engine. Turns connection lifecycle events and client messages into
/// addressed server messages. Payloads pass through untouched.
pub struct SignalingRouter {
    membership: Arc<MembershipService>,
    output: Arc<dyn SignalingOutput>,
    delivery_receipts: bool,
}

impl SignalingRouter {
    pub fn new(membership: Arc<MembershipService>, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            membership,
            output,
            delivery_receipts: false,
        }
    }

    /// Tell senders when their target could not be reached.
    pub fn with_delivery_receipts(mut self, enabled: bool) -> Self {
        self.delivery_receipts = enabled;
        self
    }

    pub fn membership(&self) -> &Arc<MembershipService> {
        &self.membership
    }

    /// Joins `conn` to `room` and sends it the members that were already there.
    /// Nobody else is told; existing members learn about the newcomer from its offers.
    pub async fn on_connect(&self, conn: ConnectionId, room: &RoomId) {
        let mut membership = self.membership.lock().await;
        let peers = membership.join(room, conn);
        info!(
            "Connection {} joined room '{}' with {} existing peer(s)",
            conn,
            room,
            peers.len()
        );

        // Sent under the lock so no departure can be announced to `conn`
        // before the snapshot that still lists the departing peer.
        self.deliver(conn, ServerMessage::PresenceList(PresenceList { peers }))
            .await;
    }

    /// Decodes and forwards one text frame from `from`.
    pub async fn on_message(&self, from: ConnectionId, text: &str) -> Result<(), RouteError> {
        let msg = match ClientMessage::decode(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Discarding malformed message from {}: {}", from, e);
                return Err(e.into());
            }
        };
        self.route(from, msg).await
    }

    pub async fn route(&self, from: ConnectionId, msg: ClientMessage) -> Result<(), RouteError> {
        let target = msg.target_id();
        let op = msg.op();

        if target == from {
            warn!("Rejecting {} from {} addressed to itself", op, from);
            return Err(RouteError::SelfAddressed(from));
        }

        let outbound = match msg {
            ClientMessage::SendOffer(req) => {
                ServerMessage::NegotiationRequested(NegotiationRequested {
                    from_id: from,
                    offer: req.offer,
                    ephemeral_id: req.ephemeral_id,
                })
            }
            ClientMessage::SendAnswer(req) => {
                ServerMessage::NegotiationComplete(NegotiationComplete {
                    from_id: from,
                    answer: req.answer,
                    ephemeral_id: req.ephemeral_id,
                })
            }
            ClientMessage::SendCandidate(req) => {
                ServerMessage::CandidateReceived(CandidateReceived {
                    from_id: from,
                    candidate: req.candidate,
                })
            }
        };

        match self.output.send_to(&target, outbound).await {
            Ok(()) => {
                debug!("Forwarded {} from {} to {}", op, from, target);
                Ok(())
            }
            Err(source) => {
                warn!("Dropping {} from {} to {}: {}", op, from, target, source);
                if self.delivery_receipts {
                    let receipt = ServerMessage::DeliveryFailed(DeliveryFailed {
                        target_id: target,
                        op: op.to_string(),
                    });
                    self.deliver(from, receipt).await;
                }
                Err(RouteError::Undelivered { target, source })
            }
        }
    }

    /// Removes `conn` from every room and tells each remaining member once.
    /// Returns how many notifications were queued.
    pub async fn on_disconnect(&self, conn: ConnectionId) -> usize {
        let mut membership = self.membership.lock().await;
        let departures = membership.leave_all(&conn);

        let mut notified = 0;
        for departure in departures {
            info!(
                "Connection {} left room '{}', {} member(s) remain",
                conn,
                departure.room,
                departure.remaining.len()
            );
            for peer in departure.remaining {
                let msg = ServerMessage::PeerDeparted(PeerDeparted { peer_id: conn });
                if self.deliver(peer, msg).await {
                    notified += 1;
                }
            }
        }
        notified
    }

    async fn deliver(&self, to: ConnectionId, msg: ServerMessage) -> bool {
        match self.output.send_to(&to, msg).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to notify {}: {}", to, e);
                false
            }
        }
    }
}
