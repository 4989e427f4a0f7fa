//! Core game state machine.
//!
//! One [`GameState`] value per client is the whole mutable game. There is no
//! central authority: each peer owns its own copy and the sync bridge keeps
//! copies approximately aligned by overwriting the shared projection
//! ([`GameSync`]) on receipt, last writer wins.

use crate::board::{
    generate_secrets_with_rng, generate_starting_tiles_with_rng, GenerateError,
};
use crate::tile::{Coord, SecretKind, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tile budget a fresh round starts with (also the initial water limit)
pub const INITIAL_TILE_BUDGET: u32 = 7;

/// Longest hint the guide may give, in characters
pub const MAX_HINT_LEN: usize = 64;

/// Explicit game phase.
///
/// The original client inferred "the round is over" from counter values; the
/// phase makes that first class. Transitions out of `Exploring` are driven
/// by [`PhaseRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round has been started yet
    Setup,
    /// A round is in progress
    Exploring,
    /// The exit was found
    Won,
    /// The tile budget ran out
    Abandoned,
}

/// Which events end a round.
///
/// The product never pinned down the exact win/loss conditions, so both
/// triggers are configurable rather than hardwired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRules {
    /// Placing the exit tile transitions to [`GamePhase::Won`]
    pub win_on_exit: bool,
    /// Reaching a zero tile budget transitions to [`GamePhase::Abandoned`]
    pub abandon_on_exhaustion: bool,
}

impl Default for PhaseRules {
    fn default() -> Self {
        Self {
            win_on_exit: true,
            abandon_on_exhaustion: true,
        }
    }
}

/// Errors surfaced by the action handlers.
///
/// Every refusal leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("no tiles left to place")]
    NoTilesLeft,

    #[error("no hint has been given")]
    NoHint,

    #[error("hint must not be empty")]
    EmptyHint,

    #[error("hint exceeds {MAX_HINT_LEN} characters")]
    HintTooLong,

    #[error("coordinate is not part of the board layout")]
    OffBoard,

    #[error("tile already carries a word")]
    TileAlreadyPlaced,

    #[error("every {0} secret has already been found")]
    SecretCapExceeded(SecretKind),

    #[error("the round is over")]
    RoundOver,
}

/// Tally of secrets uncovered so far this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundSecrets {
    pub treasures: u8,
    pub water: u8,
    pub traps: u8,
    pub curses: u8,
    pub amulet: bool,
    pub exit: bool,
}

impl FoundSecrets {
    /// Refuse counting past the generator's fixed cardinalities.
    ///
    /// Legitimate play can never hit these caps (the board holds exactly
    /// that many tiles of each kind), but a forged sync payload could.
    fn check_cap(&self, kind: SecretKind) -> Result<(), GameError> {
        let at_cap = match kind {
            SecretKind::Treasure => usize::from(self.treasures) >= kind.count(),
            SecretKind::Water => usize::from(self.water) >= kind.count(),
            SecretKind::Trap => usize::from(self.traps) >= kind.count(),
            SecretKind::Curse => usize::from(self.curses) >= kind.count(),
            SecretKind::Amulet => self.amulet,
            SecretKind::Exit => self.exit,
        };
        if at_cap {
            Err(GameError::SecretCapExceeded(kind))
        } else {
            Ok(())
        }
    }
}

/// The shared projection of [`GameState`] that crosses the wire.
///
/// Exactly the four fields the peers replicate; everything else
/// (`selectedTile`, `currentHint`, `foundSecrets`, ..) stays local to each
/// client. All fields are optional on the inbound side so that applying an
/// empty payload is a no-op, but [`GameState::sync_projection`] always
/// populates all four. There is no version field: last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSync {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<Tile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_revealed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles_left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_tiles: Option<Vec<Tile>>,
}

/// The complete per-client game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Remaining placement budget
    pub tiles_left: u32,
    /// Tiles explored so far, append-only during a round
    pub placed_tiles: Vec<Tile>,
    /// The full hidden assignment, generated once per round
    pub secrets: Vec<Tile>,
    /// Guide's local visibility toggle for hidden kinds
    pub secrets_revealed: bool,
    /// Tile chosen by the placing player, pending a hint
    pub selected_tile: Option<Coord>,
    /// Guide-supplied word awaiting placement
    pub current_hint: Option<String>,
    /// Budget restored whenever a water secret is found
    pub water_limit: u32,
    /// Secrets uncovered so far
    pub found_secrets: FoundSecrets,
    /// Explicit round phase
    pub phase: GamePhase,
    /// Round-ending triggers
    #[serde(skip, default)]
    rules: PhaseRules,
}

impl GameState {
    /// Create an empty pre-round state with default phase rules
    pub fn new() -> Self {
        Self::with_rules(PhaseRules::default())
    }

    /// Create an empty pre-round state with explicit phase rules
    pub fn with_rules(rules: PhaseRules) -> Self {
        Self {
            tiles_left: 0,
            placed_tiles: Vec::new(),
            secrets: Vec::new(),
            secrets_revealed: false,
            selected_tile: None,
            current_hint: None,
            water_limit: 0,
            found_secrets: FoundSecrets::default(),
            phase: GamePhase::Setup,
            rules,
        }
    }

    /// Start (or restart) a round.
    ///
    /// Regenerates starting tiles and secrets and resets all round state.
    /// The guide's `secrets_revealed` toggle deliberately survives a
    /// restart, matching the original client.
    pub fn start_game(&mut self) -> Result<(), GenerateError> {
        self.start_game_with_rng(&mut rand::thread_rng())
    }

    /// See [`GameState::start_game`]
    pub fn start_game_with_rng<R: Rng>(&mut self, rng: &mut R) -> Result<(), GenerateError> {
        let starting_tiles = generate_starting_tiles_with_rng(rng)?;
        let secrets = generate_secrets_with_rng(&starting_tiles, rng)?;

        self.tiles_left = INITIAL_TILE_BUDGET;
        self.water_limit = INITIAL_TILE_BUDGET;
        self.placed_tiles = starting_tiles;
        self.secrets = secrets;
        self.selected_tile = None;
        self.current_hint = None;
        self.found_secrets = FoundSecrets::default();
        self.phase = GamePhase::Exploring;
        Ok(())
    }

    /// Select the tile the placing player wants a hint for
    pub fn select_tile(&mut self, coord: Coord) -> Result<(), GameError> {
        if !coord.is_on_board() {
            return Err(GameError::OffBoard);
        }
        if self.is_worded(coord) {
            return Err(GameError::TileAlreadyPlaced);
        }
        self.selected_tile = Some(coord);
        Ok(())
    }

    /// Record the guide's next hint word
    pub fn give_hint(&mut self, hint: &str) -> Result<(), GameError> {
        if hint.is_empty() {
            return Err(GameError::EmptyHint);
        }
        if hint.chars().count() > MAX_HINT_LEN {
            return Err(GameError::HintTooLong);
        }
        self.current_hint = Some(hint.to_string());
        Ok(())
    }

    /// Place a tile at `coord`, consuming the current hint.
    ///
    /// The central transition. Refuses, leaving the state unchanged, when
    /// the round is over, the budget is spent, or no hint is pending. On
    /// success the placed tile carries the hint word plus whatever secret
    /// kind was hidden at that coordinate, the budget drops by one, and the
    /// selection and hint are cleared. A water secret additionally
    /// hard-resets the budget to the water limit.
    pub fn place_tile(&mut self, coord: Coord) -> Result<(), GameError> {
        if matches!(self.phase, GamePhase::Won | GamePhase::Abandoned) {
            return Err(GameError::RoundOver);
        }
        if self.tiles_left == 0 {
            return Err(GameError::NoTilesLeft);
        }
        if self.current_hint.is_none() {
            return Err(GameError::NoHint);
        }
        if !coord.is_on_board() {
            return Err(GameError::OffBoard);
        }
        if self.is_worded(coord) {
            return Err(GameError::TileAlreadyPlaced);
        }

        let kind = self.secret_kind_at(coord);
        if let Some(kind) = kind {
            self.found_secrets.check_cap(kind)?;
        }

        // All checks passed; mutate.
        let word = self.current_hint.take();
        self.selected_tile = None;
        self.placed_tiles.push(Tile { coord, word, kind });
        self.tiles_left -= 1;

        match kind {
            Some(SecretKind::Treasure) => self.found_secrets.treasures += 1,
            Some(SecretKind::Water) => {
                self.found_secrets.water += 1;
                self.tiles_left = self.water_limit;
            }
            Some(SecretKind::Trap) => self.found_secrets.traps += 1,
            Some(SecretKind::Curse) => self.found_secrets.curses += 1,
            Some(SecretKind::Amulet) => self.found_secrets.amulet = true,
            Some(SecretKind::Exit) => {
                self.found_secrets.exit = true;
                if self.rules.win_on_exit {
                    self.phase = GamePhase::Won;
                }
            }
            None => {}
        }

        if self.tiles_left == 0
            && self.rules.abandon_on_exhaustion
            && self.phase == GamePhase::Exploring
        {
            self.phase = GamePhase::Abandoned;
        }

        Ok(())
    }

    /// Flip the guide's local secret visibility.
    ///
    /// Pure view state for this client; it never changes what the tiles
    /// actually are.
    pub fn toggle_secrets(&mut self) {
        self.secrets_revealed = !self.secrets_revealed;
    }

    /// The restricted projection the sync bridge broadcasts
    pub fn sync_projection(&self) -> GameSync {
        GameSync {
            secrets: Some(self.secrets.clone()),
            secrets_revealed: Some(self.secrets_revealed),
            tiles_left: Some(self.tiles_left),
            placed_tiles: Some(self.placed_tiles.clone()),
        }
    }

    /// Apply an inbound peer projection, overwriting local fields verbatim.
    ///
    /// Deliberately unvalidated: this is the replication primitive of the
    /// trust-all peer model. Fields absent from the payload are left alone,
    /// so applying `GameSync::default()` is a no-op.
    pub fn apply_sync(&mut self, sync: GameSync) {
        if let Some(secrets) = sync.secrets {
            self.secrets = secrets;
        }
        if let Some(secrets_revealed) = sync.secrets_revealed {
            self.secrets_revealed = secrets_revealed;
        }
        if let Some(tiles_left) = sync.tiles_left {
            self.tiles_left = tiles_left;
        }
        if let Some(placed_tiles) = sync.placed_tiles {
            self.placed_tiles = placed_tiles;
        }
    }

    /// The secret kind hidden at a coordinate, if any
    pub fn secret_kind_at(&self, coord: Coord) -> Option<SecretKind> {
        self.secrets
            .iter()
            .find(|t| t.coord == coord)
            .and_then(|t| t.kind)
    }

    /// Whether a coordinate already carries a placed word
    pub fn is_worded(&self, coord: Coord) -> bool {
        self.placed_tiles
            .iter()
            .any(|t| t.coord == coord && t.word.is_some())
    }

    /// The phase rules this state was created with
    pub fn rules(&self) -> PhaseRules {
        self.rules
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
