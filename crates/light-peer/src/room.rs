//! Peer room bookkeeping.
//!
//! A room is nothing but a named set of peers that forward each other's
//! game payloads. Membership carries no authority: the relay observes
//! joins and leaves for routing and logging only.

use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("wrong app id or password")]
    BadCredentials,

    #[error("peer not in room")]
    PeerNotInRoom,

    #[error("not in any room")]
    NotInARoom,
}

/// A peer room on the relay.
#[derive(Debug, Clone)]
pub struct PeerRoom {
    pub name: String,
    peers: HashSet<Uuid>,
}

impl PeerRoom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            peers: HashSet::new(),
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn contains(&self, peer_id: Uuid) -> bool {
        self.peers.contains(&peer_id)
    }

    /// Add a peer; returns false if it was already a member
    pub fn add_peer(&mut self, peer_id: Uuid) -> bool {
        self.peers.insert(peer_id)
    }

    /// Remove a peer; returns true if the room is now empty
    pub fn remove_peer(&mut self, peer_id: Uuid) -> Result<bool, RoomError> {
        if !self.peers.remove(&peer_id) {
            return Err(RoomError::PeerNotInRoom);
        }
        Ok(self.peers.is_empty())
    }

    /// The other peers a payload from `sender` fans out to
    pub fn peers_except(&self, sender: Uuid) -> Vec<Uuid> {
        self.peers.iter().copied().filter(|&p| p != sender).collect()
    }

    pub fn peer_ids(&self) -> Vec<Uuid> {
        self.peers.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_peers() {
        let mut room = PeerRoom::new("abendrunde");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(room.add_peer(a));
        assert!(room.add_peer(b));
        assert!(!room.add_peer(a), "re-adding is a no-op");
        assert_eq!(room.peer_count(), 2);

        assert_eq!(room.remove_peer(a), Ok(false));
        assert_eq!(room.remove_peer(a), Err(RoomError::PeerNotInRoom));
        assert_eq!(room.remove_peer(b), Ok(true), "last peer empties the room");
    }

    #[test]
    fn test_peers_except_excludes_sender() {
        let mut room = PeerRoom::new("abendrunde");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        room.add_peer(a);
        room.add_peer(b);
        room.add_peer(c);

        let targets = room.peers_except(a);
        assert_eq!(targets.len(), 2);
        assert!(!targets.contains(&a));
        assert!(targets.contains(&b));
        assert!(targets.contains(&c));
    }
}
