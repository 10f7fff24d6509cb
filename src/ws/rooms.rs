//! Per-connection room membership.
//!
//! Tracks which rooms a peer has joined and decides whether a broadcast
//! addressed to a room reaches it.

use std::collections::HashSet;

use super::PeerId;

/// Rooms joined by a single peer.
///
/// Every peer is implicitly in the room named after its own id; that room
/// cannot be left.
#[derive(Debug)]
pub struct RoomMembership {
    own_room: String,
    rooms: HashSet<String>,
}

impl RoomMembership {
    /// Creates the membership of a freshly connected peer.
    #[must_use]
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            own_room: peer_id.to_string(),
            rooms: HashSet::new(),
        }
    }

    /// Joins `room`. Returns `false` if already a member.
    pub fn join(&mut self, room: &str) -> bool {
        if room == self.own_room {
            return false;
        }
        self.rooms.insert(room.to_string())
    }

    /// Leaves `room`. Returns `false` if not a member.
    pub fn leave(&mut self, room: &str) -> bool {
        self.rooms.remove(room)
    }

    /// Returns `true` if a broadcast to `room` reaches this peer.
    /// `None` addresses every peer.
    #[must_use]
    pub fn matches(&self, room: Option<&str>) -> bool {
        match room {
            None => true,
            Some(r) => r == self.own_room || self.rooms.contains(r),
        }
    }

    /// Returns the explicitly joined rooms, sorted.
    #[must_use]
    pub fn rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.rooms.iter().cloned().collect();
        rooms.sort();
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_to_all_matches() {
        let m = RoomMembership::new(PeerId::new());
        assert!(m.matches(None));
    }

    #[test]
    fn own_room_always_matches() {
        let id = PeerId::new();
        let mut m = RoomMembership::new(id);
        assert!(m.matches(Some(&id.to_string())));
        assert!(!m.join(&id.to_string()));
        assert!(!m.leave(&id.to_string()));
        assert!(m.matches(Some(&id.to_string())));
    }

    #[test]
    fn join_and_leave() {
        let mut m = RoomMembership::new(PeerId::new());
        assert!(!m.matches(Some("lobby")));
        assert!(m.join("lobby"));
        assert!(!m.join("lobby"));
        assert!(m.matches(Some("lobby")));
        assert!(m.leave("lobby"));
        assert!(!m.matches(Some("lobby")));
    }

    #[test]
    fn other_peers_room_does_not_match() {
        let m = RoomMembership::new(PeerId::new());
        assert!(!m.matches(Some(&PeerId::new().to_string())));
    }

    #[test]
    fn rooms_are_sorted() {
        let mut m = RoomMembership::new(PeerId::new());
        m.join("b");
        m.join("a");
        assert_eq!(m.rooms(), vec!["a", "b"]);
    }
}
