//! Client-side sync bridge.
//!
//! Sits between a locally owned [`GameState`] and the relay. Owns no game
//! data beyond the last projection it sent: on every local change it
//! broadcasts the restricted projection if it deep-differs from the
//! previous one, and it applies inbound projections verbatim through
//! [`GameState::apply_sync`]. Dropped messages are simply lost; there is no
//! retry, no sequence numbers, and no ordering across peers.

use crate::protocol::{ClientMessage, PeerMessage, RoomConfig};
use futures_util::{SinkExt, StreamExt};
use light_core::{GameState, GameSync};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};

/// Change detection and merge glue for one peer.
#[derive(Debug, Default)]
pub struct SyncBridge {
    last_sent: Option<GameSync>,
}

impl SyncBridge {
    pub fn new() -> Self {
        Self { last_sent: None }
    }

    /// The projection to broadcast, or `None` if nothing shared changed
    /// since the last broadcast.
    pub fn publish(&mut self, state: &GameState) -> Option<GameSync> {
        let projection = state.sync_projection();
        if self.last_sent.as_ref() == Some(&projection) {
            return None;
        }
        self.last_sent = Some(projection.clone());
        Some(projection)
    }

    /// Apply an inbound peer projection, overwriting the shared fields.
    ///
    /// Also records the resulting projection as sent, so a remote update
    /// does not bounce straight back to the peer that produced it.
    pub fn apply(&mut self, state: &mut GameState, incoming: GameSync) {
        state.apply_sync(incoming);
        self.last_sent = Some(state.sync_projection());
    }
}

/// Connect to a relay, join a room, and keep the given game state in sync.
///
/// `local_changes` fires (unit values) whenever a local action mutated the
/// state; the rendering layer owns that notification. The loop ends when
/// the socket closes or the notification channel is dropped.
pub async fn run_client(
    url: &str,
    room_name: &str,
    config: RoomConfig,
    game: Arc<Mutex<GameState>>,
    mut local_changes: mpsc::UnboundedReceiver<()>,
) -> anyhow::Result<()> {
    let (ws_stream, _) = connect_async(url).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let join = ClientMessage::JoinRoom {
        app_id: config.app_id,
        password: config.password,
        room_name: room_name.to_string(),
    };
    ws_sender
        .send(Message::Text(serde_json::to_string(&join)?.into()))
        .await?;

    let mut bridge = SyncBridge::new();

    loop {
        tokio::select! {
            change = local_changes.recv() => {
                if change.is_none() {
                    break;
                }
                let projection = {
                    let state = game.lock().await;
                    bridge.publish(&state)
                };
                if let Some(state) = projection {
                    let msg = ClientMessage::SendGame { state };
                    ws_sender
                        .send(Message::Text(serde_json::to_string(&msg)?.into()))
                        .await?;
                }
            }

            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<PeerMessage>(&text) {
                            Ok(PeerMessage::GameSync { from, state }) => {
                                let mut local = game.lock().await;
                                bridge.apply(&mut local, state);
                                info!("Applied game state from {}", from);
                            }
                            Ok(PeerMessage::Welcome { peer_id }) => {
                                info!("Connected as {}", peer_id);
                            }
                            Ok(PeerMessage::PeerJoined { peer_id }) => {
                                info!("{} joined", peer_id);
                            }
                            Ok(PeerMessage::PeerLeft { peer_id }) => {
                                info!("{} left", peer_id);
                            }
                            Ok(PeerMessage::Error { message }) => {
                                warn!("Relay error: {}", message);
                            }
                            Ok(PeerMessage::Pong) => {}
                            Err(e) => {
                                warn!("Invalid message from relay: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use light_core::{Coord, SecretKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new();
        let mut rng = StdRng::seed_from_u64(seed);
        state.start_game_with_rng(&mut rng).unwrap();
        state
    }

    fn water_coord(state: &GameState) -> Coord {
        state
            .secrets
            .iter()
            .find(|t| t.kind == Some(SecretKind::Water))
            .map(|t| t.coord)
            .unwrap()
    }

    #[test]
    fn test_publish_suppresses_unchanged_state() {
        let mut bridge = SyncBridge::new();
        let mut state = started(1);

        assert!(bridge.publish(&state).is_some(), "first publish always sends");
        assert!(bridge.publish(&state).is_none(), "unchanged state is quiet");

        // Local-only mutations do not touch the projection
        state.give_hint("leise").unwrap();
        assert!(bridge.publish(&state).is_none());

        // A placement changes shared fields
        let coord = water_coord(&state);
        state.place_tile(coord).unwrap();
        assert!(bridge.publish(&state).is_some());
        assert!(bridge.publish(&state).is_none());
    }

    #[test]
    fn test_apply_does_not_echo() {
        let mut a = started(2);
        let mut bridge_a = SyncBridge::new();
        let first = bridge_a.publish(&a).unwrap();

        let mut b = started(3);
        let mut bridge_b = SyncBridge::new();
        bridge_b.publish(&b);

        // B receives A's projection; republishing right after stays quiet
        bridge_b.apply(&mut b, first);
        assert_eq!(b.placed_tiles, a.placed_tiles);
        assert!(bridge_b.publish(&b).is_none());

        // A new local move on B goes out again
        b.give_hint("quelle").unwrap();
        let coord = water_coord(&b);
        b.place_tile(coord).unwrap();
        let outgoing = bridge_b.publish(&b).unwrap();

        // ..and lands on A
        bridge_a.apply(&mut a, outgoing);
        assert_eq!(a.placed_tiles, b.placed_tiles);
        assert_eq!(a.tiles_left, b.tiles_left);
    }

    #[test]
    fn test_last_write_wins_between_peers() {
        // Concurrent edits: whichever projection arrives last overwrites
        let mut a = started(4);
        let mut b = a.clone();

        a.give_hint("eins").unwrap();
        let coord_a = water_coord(&a);
        a.place_tile(coord_a).unwrap();

        b.give_hint("zwei").unwrap();
        let coord_b = b
            .secrets
            .iter()
            .find(|t| t.kind == Some(SecretKind::Trap))
            .map(|t| t.coord)
            .unwrap();
        b.place_tile(coord_b).unwrap();

        let mut bridge = SyncBridge::new();
        let from_a = a.sync_projection();
        let from_b = b.sync_projection();

        let mut observer = started(4);
        bridge.apply(&mut observer, from_a);
        bridge.apply(&mut observer, from_b.clone());
        assert_eq!(observer.placed_tiles, b.placed_tiles);
        assert_eq!(Some(observer.tiles_left), from_b.tiles_left);
    }
}
