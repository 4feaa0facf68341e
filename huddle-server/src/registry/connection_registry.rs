use huddle_core::{ConnectionId, RoomId};
use std::collections::{BTreeSet, HashMap};

/// Plain room <-> connection bookkeeping. Not synchronized; see `MembershipService`.
///
/// Members are kept in join order so every snapshot enumerates them the same way.
/// Rooms that become empty are dropped.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    rooms: HashMap<RoomId, Vec<ConnectionId>>,
    memberships: HashMap<ConnectionId, BTreeSet<RoomId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn` to `room`, creating the room if needed.
    /// Returns `false` if it was already a member.
    pub fn add_member(&mut self, room: &RoomId, conn: ConnectionId) -> bool {
        let members = self.rooms.entry(room.clone()).or_default();
        if members.contains(&conn) {
            return false;
        }
        members.push(conn);
        self.memberships
            .entry(conn)
            .or_default()
            .insert(room.clone());
        true
    }

    /// Snapshot of the room's members. Unknown rooms are empty.
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.rooms.get(room).cloned().unwrap_or_default()
    }

    pub fn rooms_of(&self, conn: &ConnectionId) -> Vec<RoomId> {
        self.memberships
            .get(conn)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes `conn` from every room it belongs to and returns those rooms.
    pub fn remove_everywhere(&mut self, conn: &ConnectionId) -> Vec<RoomId> {
        let Some(rooms) = self.memberships.remove(conn) else {
            return Vec::new();
        };

        for room in &rooms {
            let Some(members) = self.rooms.get_mut(room) else {
                continue;
            };
            members.retain(|m| m != conn);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }

        rooms.into_iter().collect()
    }
}
