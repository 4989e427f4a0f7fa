//! Board coordinates, tiles, and secret kinds.
//!
//! The board is a fixed hexagonal arrangement addressed by `(x, y)` grid
//! coordinates (the same coordinates the browser client feeds into CSS
//! `grid-column`/`grid-row`). Columns are staggered: odd columns sit on odd
//! rows, even columns on even rows, and cells within a column are two rows
//! apart. Many `(x, y)` pairs are therefore invalid and never appear in
//! [`BOARD_LAYOUT`].

use serde::{Deserialize, Serialize};

/// Grid coordinate of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Coord {
    /// Column (grid-column in the client)
    pub x: i32,
    /// Row (grid-row in the client)
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Adjacency under the board's loose neighbor rule.
    ///
    /// Two distinct cells are adjacent iff `|dx| <= 1` and `|dy| <= 2`.
    /// This is intentionally not hex distance 1: the staggered row skew of
    /// the layout makes this the rule the original client shipped with, and
    /// behavioral compatibility matters more than geometric purity.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        if self == other {
            return false;
        }
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 2
    }

    /// Whether this coordinate is a cell of the fixed board layout
    pub fn is_on_board(&self) -> bool {
        BOARD_LAYOUT.contains(self)
    }
}

/// The six hidden tile kinds, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretKind {
    Treasure,
    Water,
    Trap,
    Curse,
    Amulet,
    Exit,
}

impl SecretKind {
    /// All secret kinds in the fixed order the generator assigns them
    pub const ALL: [SecretKind; 6] = [
        SecretKind::Treasure,
        SecretKind::Water,
        SecretKind::Trap,
        SecretKind::Curse,
        SecretKind::Amulet,
        SecretKind::Exit,
    ];

    /// How many tiles of this kind exist per game
    pub const fn count(&self) -> usize {
        match self {
            SecretKind::Treasure | SecretKind::Water | SecretKind::Trap | SecretKind::Curse => 3,
            SecretKind::Amulet | SecretKind::Exit => 1,
        }
    }

    /// Lowercase wire name, as it appears in the JSON payloads
    pub const fn name(&self) -> &'static str {
        match self {
            SecretKind::Treasure => "treasure",
            SecretKind::Water => "water",
            SecretKind::Trap => "trap",
            SecretKind::Curse => "curse",
            SecretKind::Amulet => "amulet",
            SecretKind::Exit => "exit",
        }
    }
}

impl std::fmt::Display for SecretKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single board tile.
///
/// `word` present means the tile has been placed and shows a guide-supplied
/// hint to everyone. `kind` present means the tile hides one of the six
/// secrets; it stays invisible to the placing player until placed or until
/// the guide reveals secrets locally.
///
/// Serializes flat as `{"x": .., "y": .., "word"?: .., "type"?: ..}` to stay
/// wire compatible with the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(flatten)]
    pub coord: Coord,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub word: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<SecretKind>,
}

impl Tile {
    /// A plain tile with neither word nor secret
    pub fn plain(coord: Coord) -> Self {
        Self {
            coord,
            word: None,
            kind: None,
        }
    }

    /// A tile carrying a hidden secret
    pub fn secret(coord: Coord, kind: SecretKind) -> Self {
        Self {
            coord,
            word: None,
            kind: Some(kind),
        }
    }

    /// A placed tile carrying a hint word
    pub fn worded(coord: Coord, word: impl Into<String>) -> Self {
        Self {
            coord,
            word: Some(word.into()),
            kind: None,
        }
    }
}

/// The fixed board layout: 36 cells in six staggered columns.
///
/// Odd columns occupy rows 1, 3, .., 11; even columns rows 2, 4, .., 12.
/// Every cell has at least 2 neighbors under [`Coord::is_adjacent`], so the
/// starting-tile generator can always find its two companions.
pub const BOARD_LAYOUT: [Coord; 36] = [
    Coord::new(1, 1),
    Coord::new(1, 3),
    Coord::new(1, 5),
    Coord::new(1, 7),
    Coord::new(1, 9),
    Coord::new(1, 11),
    Coord::new(2, 2),
    Coord::new(2, 4),
    Coord::new(2, 6),
    Coord::new(2, 8),
    Coord::new(2, 10),
    Coord::new(2, 12),
    Coord::new(3, 1),
    Coord::new(3, 3),
    Coord::new(3, 5),
    Coord::new(3, 7),
    Coord::new(3, 9),
    Coord::new(3, 11),
    Coord::new(4, 2),
    Coord::new(4, 4),
    Coord::new(4, 6),
    Coord::new(4, 8),
    Coord::new(4, 10),
    Coord::new(4, 12),
    Coord::new(5, 1),
    Coord::new(5, 3),
    Coord::new(5, 5),
    Coord::new(5, 7),
    Coord::new(5, 9),
    Coord::new(5, 11),
    Coord::new(6, 2),
    Coord::new(6, 4),
    Coord::new(6, 6),
    Coord::new(6, 8),
    Coord::new(6, 10),
    Coord::new(6, 12),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_layout_has_unique_cells() {
        let unique: HashSet<_> = BOARD_LAYOUT.iter().collect();
        assert_eq!(unique.len(), BOARD_LAYOUT.len());
        assert_eq!(BOARD_LAYOUT.len(), 36);
    }

    #[test]
    fn test_every_cell_has_enough_neighbors() {
        for cell in &BOARD_LAYOUT {
            let neighbors = BOARD_LAYOUT
                .iter()
                .filter(|c| c.is_adjacent(cell))
                .count();
            assert!(
                neighbors >= 2,
                "cell ({}, {}) has only {} neighbors",
                cell.x,
                cell.y,
                neighbors
            );
        }
    }

    #[test]
    fn test_adjacency_is_loose_not_hex_distance() {
        let a = Coord::new(3, 5);
        // Same column, two rows apart
        assert!(a.is_adjacent(&Coord::new(3, 3)));
        assert!(a.is_adjacent(&Coord::new(3, 7)));
        // Staggered neighbors one column over
        assert!(a.is_adjacent(&Coord::new(2, 4)));
        assert!(a.is_adjacent(&Coord::new(4, 6)));
        // The loose rule also accepts |dy| == 2 across columns
        assert!(a.is_adjacent(&Coord::new(2, 3)));
        assert!(a.is_adjacent(&Coord::new(4, 7)));
        // Not adjacent to itself
        assert!(!a.is_adjacent(&a));
        // Too far
        assert!(!a.is_adjacent(&Coord::new(5, 5)));
        assert!(!a.is_adjacent(&Coord::new(3, 9)));
    }

    #[test]
    fn test_corner_cell_neighbor_count() {
        // (1, 1) only touches (1, 3) and (2, 2) within the layout
        let corner = Coord::new(1, 1);
        let neighbors: Vec<_> = BOARD_LAYOUT
            .iter()
            .filter(|c| c.is_adjacent(&corner))
            .collect();
        assert_eq!(neighbors.len(), 2);
    }

    #[test]
    fn test_tile_serializes_flat() {
        let tile = Tile::secret(Coord::new(2, 4), SecretKind::Water);
        assert_eq!(
            serde_json::to_value(&tile).unwrap(),
            json!({"x": 2, "y": 4, "type": "water"})
        );

        let tile = Tile::worded(Coord::new(1, 3), "Fluss");
        assert_eq!(
            serde_json::to_value(&tile).unwrap(),
            json!({"x": 1, "y": 3, "word": "Fluss"})
        );

        let plain = Tile::plain(Coord::new(5, 9));
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!({"x": 5, "y": 9}));
    }

    #[test]
    fn test_tile_round_trips_through_json() {
        let tile = Tile {
            coord: Coord::new(4, 6),
            word: Some("Lagune".to_string()),
            kind: Some(SecretKind::Exit),
        };
        let text = serde_json::to_string(&tile).unwrap();
        let back: Tile = serde_json::from_str(&text).unwrap();
        assert_eq!(tile, back);
    }

    #[test]
    fn test_secret_kind_counts_sum_to_fourteen() {
        let total: usize = SecretKind::ALL.iter().map(|k| k.count()).sum();
        assert_eq!(total, 14);
    }
}
