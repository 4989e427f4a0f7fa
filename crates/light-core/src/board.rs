//! Board generation: starting tiles and the hidden secret assignment.
//!
//! Both generators are pure given their RNG and run fresh on every game
//! start. The `_with_rng` variants exist so tests can drive them with a
//! seeded [`rand::rngs::StdRng`].

use crate::tile::{Coord, SecretKind, Tile, BOARD_LAYOUT};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Number of starting tiles every round begins with
pub const STARTING_TILE_COUNT: usize = 3;

/// Number of secret tiles hidden on the board each round (3+3+3+3+1+1)
pub const SECRET_TILE_COUNT: usize = 14;

/// The fixed hint word pool the starting tiles draw from.
///
/// Loaded once at startup in the original client; baked in here as
/// immutable configuration data.
pub const WORD_LIST: &[&str] = &[
    "Fackel",
    "Kompass",
    "Laterne",
    "Dschungel",
    "Tempel",
    "Schlange",
    "Fluss",
    "Lagune",
    "Wasserfall",
    "Lichtung",
    "Nebel",
    "Ruine",
    "Statue",
    "Altar",
    "Krone",
    "Spiegel",
    "Schlucht",
    "Lianen",
    "Moos",
    "Fels",
    "Leuchtturm",
    "Sumpf",
    "Echo",
    "Schatten",
    "Funke",
    "Glut",
    "Quelle",
    "Brunnen",
    "Pfad",
    "Tor",
    "Schluessel",
    "Karte",
    "Stern",
    "Mond",
    "Sonne",
    "Wind",
    "Sturm",
    "Asche",
    "Kristall",
    "Perle",
    "Anker",
    "Segel",
    "Truhe",
    "Kerze",
    "Glocke",
    "Feder",
    "Wurzel",
    "Dorn",
];

/// Failures the generators surface instead of sampling out of range.
///
/// The shipped [`BOARD_LAYOUT`] and [`WORD_LIST`] can never trip these, but
/// the guards stay so an alternative layout fails loudly rather than
/// panicking mid-sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("anchor tile has {found} free neighbors, need {need}")]
    InsufficientNeighbors { need: usize, found: usize },

    #[error("board has {found} free tiles, need {need} for secrets")]
    InsufficientFreeTiles { need: usize, found: usize },

    #[error("word list has {found} words, need {need}")]
    InsufficientWords { need: usize, found: usize },
}

/// Generate the three starting tiles: a random anchor plus two random
/// neighbors, each carrying a distinct word from [`WORD_LIST`].
pub fn generate_starting_tiles() -> Result<Vec<Tile>, GenerateError> {
    generate_starting_tiles_with_rng(&mut rand::thread_rng())
}

/// See [`generate_starting_tiles`]
pub fn generate_starting_tiles_with_rng<R: Rng>(rng: &mut R) -> Result<Vec<Tile>, GenerateError> {
    if WORD_LIST.len() < STARTING_TILE_COUNT {
        return Err(GenerateError::InsufficientWords {
            need: STARTING_TILE_COUNT,
            found: WORD_LIST.len(),
        });
    }

    let anchor = BOARD_LAYOUT[rng.gen_range(0..BOARD_LAYOUT.len())];
    let adjacent: Vec<Coord> = BOARD_LAYOUT
        .iter()
        .copied()
        .filter(|c| c.is_adjacent(&anchor))
        .collect();

    // An edge anchor could in principle have too few neighbors; the shipped
    // layout guarantees at least 2 everywhere.
    if adjacent.len() < STARTING_TILE_COUNT - 1 {
        return Err(GenerateError::InsufficientNeighbors {
            need: STARTING_TILE_COUNT - 1,
            found: adjacent.len(),
        });
    }

    let companions: Vec<Coord> = adjacent
        .choose_multiple(rng, STARTING_TILE_COUNT - 1)
        .copied()
        .collect();
    let words: Vec<&str> = WORD_LIST
        .choose_multiple(rng, STARTING_TILE_COUNT)
        .copied()
        .collect();

    let coords = [anchor, companions[0], companions[1]];
    Ok(coords
        .iter()
        .zip(words)
        .map(|(coord, word)| Tile::worded(*coord, word))
        .collect())
}

/// Generate the hidden secret assignment for one round.
///
/// Shuffles the layout minus the starting tiles and partitions the result
/// into consecutive blocks of 3/3/3/3/1/1, labeled treasure, water, trap,
/// curse, amulet, exit in that fixed order.
pub fn generate_secrets(starting_tiles: &[Tile]) -> Result<Vec<Tile>, GenerateError> {
    generate_secrets_with_rng(starting_tiles, &mut rand::thread_rng())
}

/// See [`generate_secrets`]
pub fn generate_secrets_with_rng<R: Rng>(
    starting_tiles: &[Tile],
    rng: &mut R,
) -> Result<Vec<Tile>, GenerateError> {
    let mut free: Vec<Coord> = BOARD_LAYOUT
        .iter()
        .copied()
        .filter(|c| !starting_tiles.iter().any(|t| t.coord == *c))
        .collect();

    if free.len() < SECRET_TILE_COUNT {
        return Err(GenerateError::InsufficientFreeTiles {
            need: SECRET_TILE_COUNT,
            found: free.len(),
        });
    }

    free.shuffle(rng);

    let mut secrets = Vec::with_capacity(SECRET_TILE_COUNT);
    let mut rest = free.as_slice();
    for kind in SecretKind::ALL {
        let (block, tail) = rest.split_at(kind.count());
        secrets.extend(block.iter().map(|coord| Tile::secret(*coord, kind)));
        rest = tail;
    }

    Ok(secrets)
}
