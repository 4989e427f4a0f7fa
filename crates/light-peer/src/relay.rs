//! WebSocket relay and connection handling.
//!
//! The relay is deliberately authority-free: it checks the shared app id
//! and password on join, then routes opaque game payloads between the
//! peers of a room. It never parses, validates, or merges game state, so
//! every consistency property (and limitation) of the game lives in the
//! clients' last-writer-wins merge.

use crate::protocol::{ClientMessage, PeerMessage, RoomConfig};
use crate::room::{PeerRoom, RoomError};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Relay state shared across all connections.
pub struct RelayState {
    /// Credentials every join must present
    pub config: RoomConfig,
    /// All active rooms, keyed by room name
    pub rooms: DashMap<String, PeerRoom>,
    /// Mapping from peer ID to the room it joined
    pub peer_rooms: DashMap<Uuid, String>,
    /// Mapping from peer ID to its message sender
    pub peer_senders: DashMap<Uuid, mpsc::UnboundedSender<PeerMessage>>,
}

impl RelayState {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: DashMap::new(),
            peer_rooms: DashMap::new(),
            peer_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific peer.
    pub fn send_to_peer(&self, peer_id: Uuid, msg: PeerMessage) {
        if let Some(sender) = self.peer_senders.get(&peer_id) {
            let _ = sender.send(msg);
        }
    }

    /// Send a message to every peer of a room except one.
    pub fn broadcast_to_room_except(&self, room_name: &str, except: Uuid, msg: PeerMessage) {
        if let Some(room) = self.rooms.get(room_name) {
            for peer_id in room.peers_except(except) {
                self.send_to_peer(peer_id, msg.clone());
            }
        }
    }

    /// Put a peer into a room, creating it on first join.
    pub fn join_room(
        &self,
        peer_id: Uuid,
        app_id: &str,
        password: &str,
        room_name: &str,
    ) -> Result<(), RoomError> {
        if room_name.is_empty() {
            return Err(RoomError::EmptyRoomName);
        }
        if !self.config.matches(app_id, password) {
            return Err(RoomError::BadCredentials);
        }

        // A rejoin moves the peer out of its old room first
        self.leave_room(peer_id);

        self.rooms
            .entry(room_name.to_string())
            .or_insert_with(|| PeerRoom::new(room_name))
            .add_peer(peer_id);
        self.peer_rooms.insert(peer_id, room_name.to_string());
        Ok(())
    }

    /// Remove a peer from its room, dropping the room once empty.
    /// Returns the left room's name if the peer was in one.
    pub fn leave_room(&self, peer_id: Uuid) -> Option<String> {
        let (_, room_name) = self.peer_rooms.remove(&peer_id)?;
        let now_empty = {
            let mut room = self.rooms.get_mut(&room_name)?;
            room.remove_peer(peer_id).unwrap_or(false)
        };
        if now_empty {
            self.rooms.remove(&room_name);
        }
        Some(room_name)
    }
}

/// Bind and run the relay.
pub async fn run_relay(addr: SocketAddr, state: Arc<RelayState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

/// Run the relay on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<RelayState>) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Guiding Light relay listening on {}", addr);
    }

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<RelayState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Assign a peer ID
    let peer_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<PeerMessage>();
    state.peer_senders.insert(peer_id, tx);

    // Send welcome message
    let welcome = PeerMessage::Welcome { peer_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                    handle_message(peer_id, client_msg, &state);
                } else {
                    warn!("Invalid message from {}: {}", peer_id, text);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Peer {} closing connection", peer_id);
                break;
            }
            Ok(Message::Ping(data)) => {
                state.send_to_peer(peer_id, PeerMessage::Pong);
                let _ = data; // Just consume it
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", peer_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    handle_disconnect(peer_id, &state);
    state.peer_senders.remove(&peer_id);
    send_task.abort();

    info!("Connection closed for {}", peer_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(peer_id: Uuid, msg: ClientMessage, state: &Arc<RelayState>) {
    match msg {
        ClientMessage::JoinRoom {
            app_id,
            password,
            room_name,
        } => match state.join_room(peer_id, &app_id, &password, &room_name) {
            Ok(()) => {
                info!("Peer {} joined room '{}'", peer_id, room_name);
                state.broadcast_to_room_except(
                    &room_name,
                    peer_id,
                    PeerMessage::PeerJoined { peer_id },
                );
            }
            Err(e) => {
                warn!("Peer {} failed to join '{}': {}", peer_id, room_name, e);
                state.send_to_peer(
                    peer_id,
                    PeerMessage::Error {
                        message: e.to_string(),
                    },
                );
            }
        },

        ClientMessage::SendGame { state: game_sync } => {
            match state.peer_rooms.get(&peer_id).as_deref() {
                Some(room_name) => {
                    // Routed verbatim; the relay has no opinion on the payload
                    state.broadcast_to_room_except(
                        room_name,
                        peer_id,
                        PeerMessage::GameSync {
                            from: peer_id,
                            state: game_sync,
                        },
                    );
                }
                None => {
                    state.send_to_peer(
                        peer_id,
                        PeerMessage::Error {
                            message: RoomError::NotInARoom.to_string(),
                        },
                    );
                }
            }
        }

        ClientMessage::Ping => {
            state.send_to_peer(peer_id, PeerMessage::Pong);
        }
    }
}

/// Handle peer disconnect.
fn handle_disconnect(peer_id: Uuid, state: &Arc<RelayState>) {
    if let Some(room_name) = state.leave_room(peer_id) {
        info!("Peer {} left room '{}'", peer_id, room_name);
        state.broadcast_to_room_except(&room_name, peer_id, PeerMessage::PeerLeft { peer_id });
    }
}
