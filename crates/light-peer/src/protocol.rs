//! Wire protocol for the Guiding Light peer relay.
//!
//! One logical topic carries game payloads: a client `SendGame` fans out to
//! the other peers of the room as `GameSync`. The relay never looks inside
//! the [`light_core::GameSync`] it routes. No version field anywhere;
//! schema changes are breaking with no negotiation.

use light_core::GameSync;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed application identifier shared by all clients
pub const DEFAULT_APP_ID: &str = "guiding-light";

/// Fixed embedded room password; not user-rotatable
pub const DEFAULT_PASSWORD: &str = "licht-im-dunkel-7312";

/// The credentials a relay accepts. The room name is the only per-session
/// discriminator on top of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub app_id: String,
    pub password: String,
}

impl RoomConfig {
    pub fn matches(&self, app_id: &str, password: &str) -> bool {
        self.app_id == app_id && self.password == password
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Messages sent from a peer to the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Join (or create) a room
    JoinRoom {
        app_id: String,
        password: String,
        room_name: String,
    },

    /// Broadcast a game state projection to the other peers in the room
    SendGame { state: GameSync },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from the relay to a peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PeerMessage {
    /// Welcome message with assigned peer ID
    Welcome { peer_id: Uuid },

    /// Another peer joined the room
    PeerJoined { peer_id: Uuid },

    /// Another peer left the room
    PeerLeft { peer_id: Uuid },

    /// A peer's game state projection, forwarded verbatim
    GameSync { from: Uuid, state: GameSync },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_matches() {
        let config = RoomConfig::default();
        assert!(config.matches(DEFAULT_APP_ID, DEFAULT_PASSWORD));
        assert!(!config.matches(DEFAULT_APP_ID, "wrong"));
        assert!(!config.matches("other-app", DEFAULT_PASSWORD));
    }

    #[test]
    fn test_messages_are_tagged() {
        let msg = ClientMessage::JoinRoom {
            app_id: DEFAULT_APP_ID.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            room_name: "abend".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "JoinRoom");
        assert_eq!(value["payload"]["room_name"], "abend");

        let pong = serde_json::to_string(&PeerMessage::Pong).unwrap();
        let back: PeerMessage = serde_json::from_str(&pong).unwrap();
        assert!(matches!(back, PeerMessage::Pong));
    }

    #[test]
    fn test_send_game_carries_projection() {
        let msg = ClientMessage::SendGame {
            state: GameSync::default(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "SendGame");
        // Empty projection serializes to an empty object
        assert_eq!(value["payload"]["state"], serde_json::json!({}));
    }
}
