//! Board representation: pieces, colors and the position index.
//!
//! This module contains:
//! - `Color` for the two sides
//! - `Piece` with a stable identity
//! - `Board`, a persistent arena of pieces plus a position-keyed index
//! - The standard starting layout
//!
//! `Board` is built on `im` collections so cloning a snapshot is O(1) and each
//! executed move produces a new value instead of mutating a shared one.

use crate::hex::{board_positions, Position, BOARD_RADIUS};
use im::{HashMap, OrdMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pieces per color in the standard layout
pub const PIECES_PER_COLOR: usize = 14;

/// The two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Moves first
    Black,
    White,
}

impl Color {
    /// Both colors, Black first
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// The other side
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-letter symbol used in text rendering
    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("black"),
            Color::White => f.write_str("white"),
        }
    }
}

/// Stable piece identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

/// A piece on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub position: Position,
    pub color: Color,
}

impl Piece {
    pub fn new(id: PieceId, position: Position, color: Color) -> Self {
        Self {
            id,
            position,
            color,
        }
    }
}

/// Errors from building a board out of an explicit piece list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Duplicate piece id {0:?}")]
    DuplicateId(PieceId),

    #[error("Two pieces share position {0}")]
    DuplicatePosition(Position),

    #[error("Piece {0:?} at {1} is off the board")]
    OffBoard(PieceId, Position),
}

/// The set of active pieces.
///
/// Invariants: every piece is on the board, no two pieces share a position,
/// and `occupancy` is exactly the inverse of `pieces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardJson", try_from = "BoardJson")]
pub struct Board {
    /// Board radius (5 for the standard board)
    radius: i32,
    /// All active pieces indexed by identity
    pieces: OrdMap<PieceId, Piece>,
    /// Which piece sits on which cell
    occupancy: HashMap<Position, PieceId>,
}

impl Board {
    /// Create an empty board of the given radius
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            pieces: OrdMap::new(),
            occupancy: HashMap::new(),
        }
    }

    /// Create the standard starting layout on the standard board
    pub fn standard() -> Self {
        Self::standard_with_radius(BOARD_RADIUS)
    }

    /// Standard starting layout on a board of at least the standard radius.
    ///
    /// Black fills rows r = 4 and r = 3 plus the middle three cells of r = 2;
    /// White is the point reflection through the center. Black ids are 0-13,
    /// White ids 14-27.
    pub fn standard_with_radius(radius: i32) -> Self {
        let black = standard_black_positions();
        let white = black.iter().map(|p| Position::new(-p.q, -p.r));

        let pieces = black
            .iter()
            .copied()
            .map(|p| (p, Color::Black))
            .chain(white.map(|p| (p, Color::White)))
            .enumerate()
            .map(|(i, (pos, color))| Piece::new(PieceId(i as u16), pos, color));

        let mut board = Self::new(radius);
        for piece in pieces {
            board.insert(piece);
        }
        board
    }

    /// Build a board from explicit pieces, checking every invariant
    pub fn with_pieces<I>(radius: i32, pieces: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut board = Self::new(radius);
        for piece in pieces {
            if board.pieces.contains_key(&piece.id) {
                return Err(BoardError::DuplicateId(piece.id));
            }
            if board.occupancy.contains_key(&piece.position) {
                return Err(BoardError::DuplicatePosition(piece.position));
            }
            if !piece.position.is_on_board(radius) {
                return Err(BoardError::OffBoard(piece.id, piece.position));
            }
            board.insert(piece);
        }
        Ok(board)
    }

    /// Build a board from `(position, color)` pairs, assigning ids in order
    pub fn from_layout<I>(radius: i32, layout: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Position, Color)>,
    {
        let pieces = layout
            .into_iter()
            .enumerate()
            .map(|(i, (pos, color))| Piece::new(PieceId(i as u16), pos, color));
        Self::with_pieces(radius, pieces)
    }

    /// Board radius
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Whether a cell lies on this board
    pub fn is_on_board(&self, pos: Position) -> bool {
        pos.is_on_board(self.radius)
    }

    /// Whether a cell is on the board and unoccupied
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_on_board(pos) && !self.occupancy.contains_key(&pos)
    }

    /// The piece on a cell, if any
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.occupancy.get(&pos).and_then(|id| self.pieces.get(id))
    }

    /// The color on a cell, if any
    pub fn color_at(&self, pos: Position) -> Option<Color> {
        self.piece_at(pos).map(|p| p.color)
    }

    /// Look up a piece by identity
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// All pieces in id order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// All pieces of one color in id order
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |p| p.color == color)
    }

    /// Number of active pieces
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Number of active pieces of one color
    pub fn count(&self, color: Color) -> usize {
        self.pieces_of(color).count()
    }

    /// Every on-board cell for this board, in stable order
    pub fn cells(&self) -> Vec<Position> {
        board_positions(self.radius)
    }

    /// Check the structural invariants (used by tests and debug assertions)
    pub fn is_consistent(&self) -> bool {
        self.pieces.len() == self.occupancy.len()
            && self.pieces.iter().all(|(id, piece)| {
                piece.id == *id
                    && piece.position.is_on_board(self.radius)
                    && self.occupancy.get(&piece.position) == Some(id)
            })
    }

    fn insert(&mut self, piece: Piece) {
        self.occupancy.insert(piece.position, piece.id);
        self.pieces.insert(piece.id, piece);
    }

    /// Move a piece to a free cell. The caller guarantees `to` is free.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Position) -> Option<Position> {
        let piece = self.pieces.get_mut(&id)?;
        let from = piece.position;
        piece.position = to;
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        Some(from)
    }

    /// Take a piece off the board
    pub(crate) fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        self.occupancy.remove(&piece.position);
        Some(piece)
    }

    /// Convert to a JSON-friendly representation with an array instead of maps
    pub fn to_json_friendly(&self) -> BoardJson {
        BoardJson {
            radius: self.radius,
            pieces: self.pieces.values().copied().collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_black_positions() -> Vec<Position> {
    let back = (-4..=0).map(|q| Position::new(q, 4));
    let middle = (-4..=1).map(|q| Position::new(q, 3));
    let front = (-2..=0).map(|q| Position::new(q, 2));
    back.chain(middle).chain(front).collect()
}

/// JSON-friendly board representation with an array instead of maps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJson {
    pub radius: i32,
    pub pieces: Vec<Piece>,
}

impl From<Board> for BoardJson {
    fn from(board: Board) -> Self {
        board.to_json_friendly()
    }
}

impl TryFrom<BoardJson> for Board {
    type Error = BoardError;

    fn try_from(json: BoardJson) -> Result<Self, Self::Error> {
        Board::with_pieces(json.radius, json.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_board_has_14_per_color() {
        let board = Board::standard();
        assert_eq!(board.count(Color::Black), PIECES_PER_COLOR);
        assert_eq!(board.count(Color::White), PIECES_PER_COLOR);
        assert_eq!(board.len(), 28);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_standard_layout_is_symmetric() {
        let board = Board::standard();
        for piece in board.pieces() {
            let mirrored = Position::new(-piece.position.q, -piece.position.r);
            assert_eq!(board.color_at(mirrored), Some(piece.color.opponent()));
        }
    }

    #[test]
    fn test_standard_layout_rows() {
        let board = Board::standard();
        let row = |r: i32, color: Color| board.pieces_of(color).filter(|p| p.position.r == r).count();

        assert_eq!(row(4, Color::Black), 5);
        assert_eq!(row(3, Color::Black), 6);
        assert_eq!(row(2, Color::Black), 3);
        assert_eq!(row(-4, Color::White), 5);
        assert_eq!(row(-3, Color::White), 6);
        assert_eq!(row(-2, Color::White), 3);
    }

    #[test]
    fn test_piece_lookup() {
        let board = Board::standard();
        let piece = board.piece_at(Position::new(-4, 4)).unwrap();
        assert_eq!(piece.color, Color::Black);
        assert_eq!(board.get(piece.id), Some(piece));
        assert_eq!(board.piece_at(Position::ORIGIN), None);
        assert!(board.is_free(Position::ORIGIN));
        assert!(!board.is_free(Position::new(5, 0)));
    }

    #[test]
    fn test_with_pieces_rejects_bad_sets() {
        let a = Piece::new(PieceId(0), Position::ORIGIN, Color::Black);
        let dup_id = Piece::new(PieceId(0), Position::new(1, 0), Color::White);
        let dup_pos = Piece::new(PieceId(1), Position::ORIGIN, Color::White);
        let off = Piece::new(PieceId(2), Position::new(5, 0), Color::White);

        assert_eq!(
            Board::with_pieces(BOARD_RADIUS, [a, dup_id]),
            Err(BoardError::DuplicateId(PieceId(0)))
        );
        assert_eq!(
            Board::with_pieces(BOARD_RADIUS, [a, dup_pos]),
            Err(BoardError::DuplicatePosition(Position::ORIGIN))
        );
        assert_eq!(
            Board::with_pieces(BOARD_RADIUS, [a, off]),
            Err(BoardError::OffBoard(PieceId(2), Position::new(5, 0)))
        );
    }

    #[test]
    fn test_relocate_and_remove_keep_index_in_sync() {
        let mut board = Board::from_layout(
            BOARD_RADIUS,
            [(Position::ORIGIN, Color::Black), (Position::new(1, 0), Color::White)],
        )
        .unwrap();
        let snapshot = board.clone();

        assert_eq!(board.relocate(PieceId(0), Position::new(0, 1)), Some(Position::ORIGIN));
        assert!(board.is_free(Position::ORIGIN));
        assert_eq!(board.color_at(Position::new(0, 1)), Some(Color::Black));

        let removed = board.remove(PieceId(1)).unwrap();
        assert_eq!(removed.color, Color::White);
        assert_eq!(board.len(), 1);
        assert!(board.is_consistent());

        // The earlier snapshot is untouched
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.color_at(Position::ORIGIN), Some(Color::Black));
    }

    #[test]
    fn test_json_round_trip_revalidates() {
        let board = Board::standard();
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, restored);

        let bad = r#"{"radius":5,"pieces":[
            {"id":0,"position":{"q":0,"r":0},"color":"Black"},
            {"id":1,"position":{"q":0,"r":0},"color":"White"}]}"#;
        assert!(serde_json::from_str::<Board>(bad).is_err());
    }
}
