//! Peer networking for Guiding Light.
//!
//! - [`protocol`]: wire messages and the fixed room credentials
//! - [`room`]: peer room bookkeeping
//! - [`relay`]: the zero-authority WebSocket relay
//! - [`bridge`]: the client-side sync bridge

pub mod bridge;
pub mod protocol;
pub mod relay;
pub mod room;

pub use bridge::{run_client, SyncBridge};
pub use protocol::{ClientMessage, PeerMessage, RoomConfig, DEFAULT_APP_ID, DEFAULT_PASSWORD};
pub use relay::{run_relay, RelayState};
pub use room::{PeerRoom, RoomError};
