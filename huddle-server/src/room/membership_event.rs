use huddle_core::{ConnectionId, RoomId};

/// Published by `MembershipService` after each committed change, in commit order.
/// `members` is the room size after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    Joined {
        room: RoomId,
        connection: ConnectionId,
        members: usize,
    },
    Left {
        room: RoomId,
        connection: ConnectionId,
        members: usize,
    },
}

impl MembershipEvent {
    pub fn room(&self) -> &RoomId {
        match self {
            Self::Joined { room, .. } | Self::Left { room, .. } => room,
        }
    }
}
