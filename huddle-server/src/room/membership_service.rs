use crate::registry::ConnectionRegistry;
use crate::room::MembershipEvent;
use huddle_core::{ConnectionId, RoomId};
use tokio::sync::{Mutex, MutexGuard, broadcast};

/// A room the departing connection was removed from, and who is still in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomId,
    pub remaining: Vec<ConnectionId>,
}

/// The only path to the registry. Every mutation and every snapshot used for
/// addressing goes through one lock, so joins and departures are totally ordered.
pub struct MembershipService {
    registry: Mutex<ConnectionRegistry>,
    events: broadcast::Sender<MembershipEvent>,
}

impl MembershipService {
    pub fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            registry: Mutex::new(ConnectionRegistry::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }

    /// Holds the membership lock until the guard is dropped.
    ///
    /// Used when messages must go out before any other membership change can commit,
    /// e.g. a presence list that has to reflect exactly the state it was taken from.
    pub async fn lock(&self) -> MembershipGuard<'_> {
        MembershipGuard {
            registry: self.registry.lock().await,
            events: &self.events,
        }
    }

    pub async fn join(&self, room: &RoomId, conn: ConnectionId) -> Vec<ConnectionId> {
        self.lock().await.join(room, conn)
    }

    pub async fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.lock().await.members(room)
    }

    pub async fn rooms_of(&self, conn: &ConnectionId) -> Vec<RoomId> {
        self.lock().await.rooms_of(conn)
    }

    pub async fn leave_all(&self, conn: &ConnectionId) -> Vec<Departure> {
        self.lock().await.leave_all(conn)
    }
}

pub struct MembershipGuard<'a> {
    registry: MutexGuard<'a, ConnectionRegistry>,
    events: &'a broadcast::Sender<MembershipEvent>,
}

impl MembershipGuard<'_> {
    /// Adds `conn` to `room` and returns the other members at that instant.
    pub fn join(&mut self, room: &RoomId, conn: ConnectionId) -> Vec<ConnectionId> {
        let members = if self.registry.add_member(room, conn) {
            let members = self.registry.members(room);
            self.publish(MembershipEvent::Joined {
                room: room.clone(),
                connection: conn,
                members: members.len(),
            });
            members
        } else {
            self.registry.members(room)
        };

        members.into_iter().filter(|m| *m != conn).collect()
    }

    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.registry.members(room)
    }

    pub fn rooms_of(&self, conn: &ConnectionId) -> Vec<RoomId> {
        self.registry.rooms_of(conn)
    }

    /// Removes `conn` from every room, capturing each room's remaining members
    /// in the same critical section.
    pub fn leave_all(&mut self, conn: &ConnectionId) -> Vec<Departure> {
        let rooms = self.registry.remove_everywhere(conn);

        rooms
            .into_iter()
            .map(|room| {
                let remaining = self.registry.members(&room);
                self.publish(MembershipEvent::Left {
                    room: room.clone(),
                    connection: *conn,
                    members: remaining.len(),
                });
                Departure { room, remaining }
            })
            .collect()
    }

    fn publish(&self, event: MembershipEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
