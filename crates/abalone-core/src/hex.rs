//! Hex coordinate system using cube coordinates (q, r, s).
//!
//! This module provides the foundational geometry for the hexagonal board:
//! - `Position`: Identifies a single cell
//! - `Direction`: One of the six unit steps between neighboring cells
//!
//! Only `q` and `r` are stored; `s` is derived as `-q - r`, so the cube
//! constraint q + r + s = 0 holds for every `Position` that can exist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Standard board radius. Cells satisfy |q|, |r|, |s| < radius, giving 61 cells.
pub const BOARD_RADIUS: i32 = 5;

/// One of the six directions on the hex grid.
///
/// Directions `i` and `(i + 3) % 6` are opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// +q, -s
    East,
    /// +q, -r
    NorthEast,
    /// -r, +s
    NorthWest,
    /// -q, +s
    West,
    /// -q, +r
    SouthWest,
    /// +r, -s
    SouthEast,
}

impl Direction {
    /// All directions in index order starting from East
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Index of this direction (0-5)
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Direction for an index, `None` outside 0-5
    pub fn from_index(index: u8) -> Option<Direction> {
        Self::ALL.get(index as usize).copied()
    }

    /// The direction pointing the other way
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() as usize + 3) % 6]
    }

    /// Unit vector (dq, dr, ds) for this direction
    pub const fn vector(self) -> (i32, i32, i32) {
        match self {
            Direction::East => (1, 0, -1),
            Direction::NorthEast => (1, -1, 0),
            Direction::NorthWest => (0, -1, 1),
            Direction::West => (-1, 0, 1),
            Direction::SouthWest => (-1, 1, 0),
            Direction::SouthEast => (0, 1, -1),
        }
    }

    /// Short lowercase name (`e`, `ne`, `nw`, `w`, `sw`, `se`)
    pub fn short_name(self) -> &'static str {
        match self {
            Direction::East => "e",
            Direction::NorthEast => "ne",
            Direction::NorthWest => "nw",
            Direction::West => "w",
            Direction::SouthWest => "sw",
            Direction::SouthEast => "se",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Failure to parse a `Direction` or `Position` from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown direction '{0}' (expected e, ne, nw, w, sw, se or 0-5)")]
    Direction(String),

    #[error("Invalid position '{0}' (expected q,r or q,r,s with q+r+s=0)")]
    Position(String),
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Direction::from_index(index).ok_or(ParseError::Direction(s.to_string()));
        }
        Direction::ALL
            .into_iter()
            .find(|d| d.short_name() == trimmed)
            .ok_or(ParseError::Direction(s.to_string()))
    }
}

/// Cube coordinate for a hex cell.
///
/// - `q` increases going east
/// - `r` increases going south-east
/// - `s` (not stored) satisfies q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Position {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going south-east)
    pub r: i32,
}

impl Position {
    /// The board center
    pub const ORIGIN: Position = Position::new(0, 0);

    /// Create a new position from its two stored axes
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Create a position from a full cube triple, rejecting q + r + s != 0
    pub fn from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        (i64::from(q) + i64::from(r) + i64::from(s) == 0).then_some(Self::new(q, r))
    }

    /// The implicit third coordinate (s = -q - r).
    ///
    /// Only meaningful for cells near the board; callers handling untrusted
    /// coordinates check [`Position::is_on_board`] first.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The full cube triple (q, r, s)
    pub const fn cube(&self) -> (i32, i32, i32) {
        (self.q, self.r, self.s())
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: Direction) -> Position {
        let (dq, dr, _) = direction.vector();
        Position::new(self.q + dq, self.r + dr)
    }

    /// The six neighboring cells in direction index order
    pub fn neighbors(&self) -> [Position; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// Cube distance to another cell (in hex steps)
    pub fn distance_to(&self, other: &Position) -> u32 {
        let (q, r, s) = self.wide_cube();
        let (oq, or, os) = other.wide_cube();
        let steps = (q - oq).abs().max((r - or).abs()).max((s - os).abs());
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Whether this cell lies on a board of the given radius.
    ///
    /// Safe for any coordinates, including ones near the `i32` limits.
    pub fn is_on_board(&self, radius: i32) -> bool {
        let radius = i64::from(radius);
        let (q, r, s) = self.wide_cube();
        q.abs() < radius && r.abs() < radius && s.abs() < radius
    }

    /// Cube triple widened so no coordinate arithmetic can overflow
    fn wide_cube(&self) -> (i64, i64, i64) {
        let (q, r) = (i64::from(self.q), i64::from(self.r));
        (q, r, -q - r)
    }

    /// Projection onto a direction vector; larger means further that way.
    pub(crate) fn projection(&self, direction: Direction) -> i32 {
        let (dq, dr, ds) = direction.vector();
        self.q * dq + self.r * dr + self.s() * ds
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (q, r, s) = self.wide_cube();
        write!(f, "({}, {}, {})", q, r, s)
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Result<Vec<i32>, _> = cleaned.split(',').map(|p| p.trim().parse()).collect();
        let err = || ParseError::Position(s.to_string());

        match parts.map_err(|_| err())?.as_slice() {
            [q, r] => Ok(Position::new(*q, *r)),
            [q, r, s] => Position::from_cube(*q, *r, *s).ok_or_else(err),
            _ => Err(err()),
        }
    }
}

/// Every on-board cell for a radius, ordered by q then r.
pub fn board_positions(radius: i32) -> Vec<Position> {
    let extent = radius - 1;
    let mut positions = Vec::new();
    for q in -extent..=extent {
        for r in -extent..=extent {
            let pos = Position::new(q, r);
            if pos.is_on_board(radius) {
                positions.push(pos);
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            let (dq, dr, ds) = dir.vector();
            let (oq, or, os) = dir.opposite().vector();
            assert_eq!((dq + oq, dr + or, ds + os), (0, 0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::NorthEast.opposite(), Direction::SouthWest);
    }

    #[test]
    fn test_direction_vectors_are_cube_units() {
        for dir in Direction::ALL {
            let (dq, dr, ds) = dir.vector();
            assert_eq!(dq + dr + ds, 0);
            assert_eq!(Position::ORIGIN.neighbor(dir).distance_to(&Position::ORIGIN), 1);
        }
    }

    #[test]
    fn test_direction_index_round_trip() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index() as usize, i);
            assert_eq!(Direction::from_index(i as u8), Some(*dir));
        }
        assert_eq!(Direction::from_index(6), None);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("e".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("NW".parse::<Direction>(), Ok(Direction::NorthWest));
        assert_eq!("5".parse::<Direction>(), Ok(Direction::SouthEast));
        assert!("6".parse::<Direction>().is_err());
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn test_neighbors_unique_and_adjacent() {
        let center = Position::new(1, -2);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for n in &neighbors {
            assert_eq!(center.distance_to(n), 1);
            assert_eq!(n.q + n.r + n.s(), 0);
        }
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0, 0);
        assert_eq!(a.distance_to(&Position::new(2, -1)), 2);
        assert_eq!(a.distance_to(&Position::new(-3, 3)), 3);
        assert_eq!(Position::new(4, 0).distance_to(&Position::new(-4, 0)), 8);
    }

    #[test]
    fn test_on_board_edges() {
        assert!(Position::new(4, 0).is_on_board(BOARD_RADIUS));
        assert!(!Position::new(5, 0).is_on_board(BOARD_RADIUS));
        assert!(Position::new(4, -4).is_on_board(BOARD_RADIUS));
        // s = -5
        assert!(!Position::new(3, 2).is_on_board(BOARD_RADIUS));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let far = Position::new(i32::MAX, i32::MAX);
        let near_min = Position::new(i32::MIN, 0);
        assert!(!far.is_on_board(BOARD_RADIUS));
        assert!(!near_min.is_on_board(BOARD_RADIUS));
        assert_eq!(far.distance_to(&Position::ORIGIN), u32::MAX);
        assert_eq!(near_min.to_string(), "(-2147483648, 0, 2147483648)");
        assert_eq!(Position::from_cube(i32::MAX, i32::MAX, i32::MIN), None);
    }

    #[test]
    fn test_standard_board_has_61_cells() {
        let cells = board_positions(BOARD_RADIUS);
        assert_eq!(cells.len(), 61);

        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 61);
        assert!(cells.iter().all(|p| p.is_on_board(BOARD_RADIUS)));
    }

    #[test]
    fn test_board_positions_stable_order() {
        assert_eq!(board_positions(BOARD_RADIUS), board_positions(BOARD_RADIUS));
        assert_eq!(board_positions(BOARD_RADIUS)[0], Position::new(-4, 0));
    }

    #[test]
    fn test_from_cube_rejects_bad_triples() {
        assert_eq!(Position::from_cube(1, 0, -1), Some(Position::new(1, 0)));
        assert_eq!(Position::from_cube(1, 1, 1), None);
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("1,-1".parse::<Position>(), Ok(Position::new(1, -1)));
        assert_eq!("(2, 0, -2)".parse::<Position>(), Ok(Position::new(2, 0)));
        assert!("1,1,1".parse::<Position>().is_err());
        assert!("x,1".parse::<Position>().is_err());
        assert_eq!(Position::new(2, 0).to_string(), "(2, 0, -2)");
    }
}
