//! Room membership registry shared by all signaling sessions.
//!
//! The registry maps room identifiers to the set of live connections that
//! joined them. It holds non-owning membership records only: each connection
//! stays owned by its session, and the registry never performs socket I/O.

use std::collections::HashMap;
use std::fmt;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Room identifier, taken verbatim from the connection path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Token identifying one live connection, issued when its membership record
/// is created. Sender comparisons and evictions go through this token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Membership record for one connection: its token plus the queue drained by
/// the connection's writer task.
#[derive(Debug, Clone)]
pub struct RoomMember {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

impl RoomMember {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            tx,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueue a text message for delivery. Never blocks; fails iff the
    /// connection's writer task is gone.
    pub fn send(&self, message: String) -> Result<(), mpsc::error::SendError<String>> {
        self.tx.send(message)
    }
}

/// Concurrency-safe mapping from room to its live members.
///
/// Backed by a lock-sharded map, so sessions operating on different rooms
/// do not serialize against each other. Invariant: a room is present iff
/// its member set is non-empty.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, HashMap<ConnectionId, RoomMember>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a room, creating the room on first join.
    pub fn join(&self, room: &RoomId, member: RoomMember) {
        self.rooms
            .entry(room.clone())
            .or_default()
            .insert(member.id, member);
    }

    /// Remove a member from a room. Removing an absent member is a no-op.
    /// The room entry is deleted as soon as its member set empties.
    pub fn leave(&self, room: &RoomId, id: ConnectionId) {
        let emptied = match self.rooms.get_mut(room) {
            Some(mut members) => members.remove(&id).is_some() && members.is_empty(),
            None => return,
        };
        // Emptiness is re-checked under the shard lock: a join racing this
        // removal keeps the room alive.
        if emptied
            && self
                .rooms
                .remove_if(room, |_, members| members.is_empty())
                .is_some()
        {
            debug!(%room, "room closed");
        }
    }

    /// Point-in-time copy of a room's members, safe to iterate while
    /// concurrent joins and leaves proceed on the same room.
    pub fn snapshot(&self, room: &RoomId) -> Vec<RoomMember> {
        self.rooms
            .get(room)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map_or(0, |members| members.len())
    }

    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> (RoomMember, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RoomMember::new(tx), rx)
    }

    #[test]
    fn join_creates_room_lazily() {
        let registry = RoomRegistry::new();
        let room = RoomId::from("abc");
        assert!(!registry.contains_room(&room));

        let (a, _rx) = member();
        registry.join(&room, a);

        assert!(registry.contains_room(&room));
        assert_eq!(registry.member_count(&room), 1);
        assert_eq!(registry.room_count(), 1);
    }

    #[test]
    fn last_leave_deletes_room() {
        let registry = RoomRegistry::new();
        let room = RoomId::from("r1");
        let (a, _rx) = member();
        let id = a.id();
        registry.join(&room, a);

        registry.leave(&room, id);

        // Gone entirely, not retained as an empty entry.
        assert!(!registry.contains_room(&room));
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn leave_is_idempotent() {
        let registry = RoomRegistry::new();
        let room = RoomId::from("z");
        let (a, _rx_a) = member();
        let (b, _rx_b) = member();
        let a_id = a.id();
        registry.join(&room, a);
        registry.join(&room, b);

        registry.leave(&room, a_id);
        registry.leave(&room, a_id);

        assert_eq!(registry.member_count(&room), 1);
    }

    #[test]
    fn leave_on_unknown_room_is_noop() {
        let registry = RoomRegistry::new();
        let (a, _rx) = member();
        registry.leave(&RoomId::from("nowhere"), a.id());
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn snapshot_is_point_in_time() {
        let registry = RoomRegistry::new();
        let room = RoomId::from("x");
        let (a, _rx_a) = member();
        registry.join(&room, a);

        let snapshot = registry.snapshot(&room);
        let (b, _rx_b) = member();
        registry.join(&room, b);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.member_count(&room), 2);
    }

    #[test]
    fn rooms_track_members_independently() {
        let registry = RoomRegistry::new();
        let (a, _rx_a) = member();
        let (b, _rx_b) = member();
        let b_id = b.id();
        registry.join(&RoomId::from("x"), a);
        registry.join(&RoomId::from("y"), b);

        assert_eq!(registry.room_count(), 2);
        registry.leave(&RoomId::from("y"), b_id);
        assert_eq!(registry.member_count(&RoomId::from("x")), 1);
        assert!(!registry.contains_room(&RoomId::from("y")));
    }

    #[test]
    fn send_reaches_member_queue() {
        let (a, mut rx) = member();
        a.send("hello".to_string()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn send_fails_when_receiver_dropped() {
        let (a, rx) = member();
        drop(rx);
        assert!(a.send("hello".to_string()).is_err());
    }
}
