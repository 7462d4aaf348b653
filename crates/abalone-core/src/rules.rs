//! Move validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. group size (1-3)
//! 2. straight line
//! 3. every selected cell occupied, all one color, and that color is to move
//! 4. in-line moves: sumito resolution; broadside moves: every destination free
//!
//! Validation is pure: it never touches the board it inspects.

use crate::board::{Board, Color, Piece};
use crate::hex::{Direction, Position};
use crate::line::{Line, MoveKind, MAX_GROUP_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Most opposing pieces any formation can displace
pub const MAX_PUSHED: usize = 2;

/// Why a move is not allowed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("No pieces selected")]
    EmptySelection,

    #[error("Cannot move more than 3 pieces")]
    TooManyPieces,

    #[error("Pieces must be in a straight line")]
    NotInLine,

    #[error("No piece at {0}")]
    EmptyCell(Position),

    #[error("All pieces must be the same color")]
    MixedColors,

    #[error("Must move your own pieces")]
    NotYourPieces,

    #[error("Cannot move off the board")]
    OffBoard,

    #[error("Cannot push your own pieces")]
    BlockedByOwnPiece,

    #[error("Cannot push through your own pieces")]
    PushThroughOwnPiece,

    #[error("Cannot push more than 2 pieces")]
    TooManyToPush,

    #[error("Need more pieces to push (sumito rule)")]
    Outnumbered,

    #[error("Destination must be empty for broadside move")]
    BroadsideBlocked,

    #[error("{0} is not on the board")]
    NotOnBoard(Position),
}

/// A move that passed validation against a specific board.
///
/// Only [`validate`] creates these. The executor validates again against the
/// board it is handed and refuses the move unless the outcome is identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalMove {
    line: Line,
    direction: Direction,
    kind: MoveKind,
    mover: Color,
    capture: Option<Piece>,
}

impl LegalMove {
    /// The moving group in line order
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Selected cells in line order
    pub fn group(&self) -> &[Position] {
        self.line.cells()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// In-line or broadside
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Color of the moving pieces
    pub fn mover(&self) -> Color {
        self.mover
    }

    /// Opposing piece this move pushes off the board, if any
    pub fn capture(&self) -> Option<&Piece> {
        self.capture.as_ref()
    }
}

/// Validate a move for `to_move`.
///
/// `group` may be given in any order; it is arranged along its line first.
pub fn validate(
    group: &[Position],
    direction: Direction,
    board: &Board,
    to_move: Color,
) -> Result<LegalMove, IllegalMove> {
    let result = check(group, direction, board, to_move);
    if let Err(reason) = &result {
        debug!(?group, %direction, %to_move, %reason, "move rejected");
    }
    result
}

fn check(
    group: &[Position],
    direction: Direction,
    board: &Board,
    to_move: Color,
) -> Result<LegalMove, IllegalMove> {
    if group.is_empty() {
        return Err(IllegalMove::EmptySelection);
    }
    if group.len() > MAX_GROUP_SIZE {
        return Err(IllegalMove::TooManyPieces);
    }
    if let Some(&pos) = group.iter().find(|&&pos| !board.is_on_board(pos)) {
        return Err(IllegalMove::NotOnBoard(pos));
    }

    let line = Line::arrange(group).ok_or(IllegalMove::NotInLine)?;
    let mover = group_color(&line, board)?;
    if mover != to_move {
        return Err(IllegalMove::NotYourPieces);
    }

    let kind = line.classify(direction);
    let capture = match kind {
        MoveKind::Inline => resolve_inline(&line, direction, board, mover)?,
        MoveKind::Broadside => {
            check_broadside(&line, direction, board)?;
            None
        }
    };

    Ok(LegalMove {
        line,
        direction,
        kind,
        mover,
        capture,
    })
}

/// The shared color of every selected cell
fn group_color(line: &Line, board: &Board) -> Result<Color, IllegalMove> {
    let mut colors = line
        .cells()
        .iter()
        .map(|&pos| board.color_at(pos).ok_or(IllegalMove::EmptyCell(pos)));

    // Lines are never empty
    let first = colors.next().ok_or(IllegalMove::EmptySelection)??;
    for color in colors {
        if color? != first {
            return Err(IllegalMove::MixedColors);
        }
    }
    Ok(first)
}

/// Sumito resolution for an in-line move; returns the piece to capture, if any
fn resolve_inline(
    line: &Line,
    direction: Direction,
    board: &Board,
    mover: Color,
) -> Result<Option<Piece>, IllegalMove> {
    let ahead = line.front(direction).neighbor(direction);

    match board.piece_at(ahead) {
        None if board.is_on_board(ahead) => Ok(None),
        None => Err(IllegalMove::OffBoard),
        Some(piece) if piece.color == mover => Err(IllegalMove::BlockedByOwnPiece),
        Some(_) => resolve_sumito(line.len(), ahead, direction, board, mover),
    }
}

/// Count the contiguous opposing chain starting at `start` and apply the
/// numeric-superiority rule.
fn resolve_sumito(
    pushers: usize,
    start: Position,
    direction: Direction,
    board: &Board,
    mover: Color,
) -> Result<Option<Piece>, IllegalMove> {
    let mut chain: Vec<&Piece> = Vec::with_capacity(MAX_PUSHED);
    let mut cursor = start;

    while let Some(piece) = board.piece_at(cursor) {
        if piece.color == mover {
            return Err(IllegalMove::PushThroughOwnPiece);
        }
        chain.push(piece);
        if chain.len() > MAX_PUSHED {
            return Err(IllegalMove::TooManyToPush);
        }
        cursor = cursor.neighbor(direction);
    }

    if pushers <= chain.len() {
        return Err(IllegalMove::Outnumbered);
    }

    // `cursor` is the cell just beyond the last opposing piece: empty, or off the board
    let last = chain.last().copied().copied();
    if board.is_on_board(cursor) {
        Ok(None)
    } else {
        Ok(last)
    }
}

/// All-or-nothing: every cell must step onto a free, on-board cell
fn check_broadside(line: &Line, direction: Direction, board: &Board) -> Result<(), IllegalMove> {
    for &pos in line.cells() {
        let dest = pos.neighbor(direction);
        if !board.is_on_board(dest) {
            return Err(IllegalMove::OffBoard);
        }
        if board.piece_at(dest).is_some() {
            return Err(IllegalMove::BroadsideBlocked);
        }
    }
    Ok(())
}
