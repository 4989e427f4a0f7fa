//! Guiding Light - a cooperative hidden-information exploration game engine
//!
//! Two players explore a fixed hexagonal board: a guide who can see the
//! hidden secret tiles feeds one-word hints to a placing player, who spends
//! a limited tile budget uncovering treasures, water, traps, curses, the
//! amulet, and the exit.
//!
//! This crate is the platform-agnostic core. It can be compiled to:
//! - Native Rust, embedded in the peer relay and its tests
//! - WebAssembly for the browser client (feature `wasm`)
//!
//! # Modules
//!
//! - [`tile`]: Coordinates, the fixed board layout, tiles, and secret kinds
//! - [`board`]: Starting-tile and secret generation
//! - [`game`]: The game state machine and the peer sync projection

pub mod board;
pub mod game;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{
    generate_secrets, generate_secrets_with_rng, generate_starting_tiles,
    generate_starting_tiles_with_rng, GenerateError, SECRET_TILE_COUNT, STARTING_TILE_COUNT,
    WORD_LIST,
};
pub use game::{
    FoundSecrets, GameError, GamePhase, GameState, GameSync, PhaseRules, INITIAL_TILE_BUDGET,
    MAX_HINT_LEN,
};
pub use tile::{Coord, SecretKind, Tile, BOARD_LAYOUT};
