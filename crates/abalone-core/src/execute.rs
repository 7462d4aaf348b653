//! Move execution.
//!
//! Turns a [`LegalMove`] into a new [`Board`]. The input board is never
//! modified: execution works on an O(1) clone of the persistent board and
//! returns it only if every step succeeded.

use crate::board::{Board, Color, Piece, PieceId};
use crate::game::GameError;
use crate::hex::{Direction, Position};
use crate::line::MoveKind;
use crate::rules::{self, LegalMove, MAX_PUSHED};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One piece changing cells. `to` is `None` when the piece left the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMove {
    pub piece: PieceId,
    pub color: Color,
    pub from: Position,
    pub to: Option<Position>,
}

/// Result of executing a move. Only [`execute`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub(crate) legal: LegalMove,
    pub(crate) board: Board,
    pub(crate) moves: Vec<PieceMove>,
    pub(crate) captured: Option<Piece>,
}

impl Execution {
    /// The move that was executed
    pub fn legal(&self) -> &LegalMove {
        &self.legal
    }

    /// The board after the move
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every displacement, pushed pieces before the movers that pushed them
    pub fn moves(&self) -> &[PieceMove] {
        &self.moves
    }

    /// The piece pushed off the board, if any
    pub fn captured(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }
}

/// Execute a validated move against the board it was validated on.
///
/// The move is validated again on `board`; anything but an identical outcome
/// (kind, pushed chain, capture) is `GameError::StaleMove`.
pub fn execute(board: &Board, legal: &LegalMove) -> Result<Execution, GameError> {
    match rules::validate(legal.group(), legal.direction(), board, legal.mover()) {
        Ok(fresh) if fresh == *legal => {}
        _ => return Err(GameError::StaleMove),
    }

    let mut next = board.clone();
    let mut moves = Vec::with_capacity(legal.line().len() + MAX_PUSHED);

    let captured = match legal.kind() {
        MoveKind::Inline => execute_inline(&mut next, legal, &mut moves)?,
        MoveKind::Broadside => {
            execute_broadside(&mut next, legal, &mut moves)?;
            None
        }
    };

    if captured.as_ref().map(|p| p.id) != legal.capture().map(|p| p.id) {
        return Err(GameError::StaleMove);
    }
    debug_assert!(next.is_consistent());
    debug_assert_eq!(next.len() + usize::from(captured.is_some()), board.len());

    Ok(Execution {
        legal: legal.clone(),
        board: next,
        moves,
        captured,
    })
}

/// Mover's piece at `pos`, or a stale-move error
fn mover_at(board: &Board, pos: Position, mover: Color) -> Result<PieceId, GameError> {
    match board.piece_at(pos) {
        Some(piece) if piece.color == mover => Ok(piece.id),
        _ => Err(GameError::StaleMove),
    }
}

fn execute_inline(
    board: &mut Board,
    legal: &LegalMove,
    moves: &mut Vec<PieceMove>,
) -> Result<Option<Piece>, GameError> {
    let direction = legal.direction();
    let mover = legal.mover();
    let mut captured = None;

    // Front piece first so every destination is vacated before it is entered
    for pos in legal.line().ordered_along(direction) {
        let id = mover_at(board, pos, mover)?;
        let dest = pos.neighbor(direction);

        if board.color_at(dest) == Some(mover.opponent()) {
            if let Some(piece) = push_chain(board, dest, direction, mover, moves)? {
                if captured.replace(piece).is_some() {
                    return Err(GameError::StaleMove);
                }
            }
        }

        if !board.is_free(dest) {
            return Err(GameError::StaleMove);
        }
        board.relocate(id, dest);
        moves.push(PieceMove {
            piece: id,
            color: mover,
            from: pos,
            to: Some(dest),
        });
    }

    Ok(captured)
}

/// Shift the opposing chain starting at `start` one cell along `direction`.
///
/// The chain is collected first and then moved farthest piece first, so no
/// destination is entered before it is vacated. Returns the piece that fell
/// off the board, if any.
fn push_chain(
    board: &mut Board,
    start: Position,
    direction: Direction,
    mover: Color,
    moves: &mut Vec<PieceMove>,
) -> Result<Option<Piece>, GameError> {
    let mut chain: Vec<Piece> = Vec::with_capacity(MAX_PUSHED);
    let mut cursor = start;

    while let Some(piece) = board.piece_at(cursor) {
        if piece.color == mover || chain.len() == MAX_PUSHED {
            return Err(GameError::StaleMove);
        }
        chain.push(*piece);
        cursor = cursor.neighbor(direction);
    }
    debug!(len = chain.len(), %direction, "pushing chain");

    let mut fallen = None;
    for piece in chain.iter().rev() {
        let dest = piece.position.neighbor(direction);
        let to = if board.is_on_board(dest) {
            board.relocate(piece.id, dest);
            Some(dest)
        } else {
            fallen = board.remove(piece.id);
            None
        };
        moves.push(PieceMove {
            piece: piece.id,
            color: piece.color,
            from: piece.position,
            to,
        });
    }

    Ok(fallen)
}

fn execute_broadside(
    board: &mut Board,
    legal: &LegalMove,
    moves: &mut Vec<PieceMove>,
) -> Result<(), GameError> {
    let direction = legal.direction();
    let mover = legal.mover();

    // Resolve everything before moving anything
    let mut steps = Vec::with_capacity(legal.line().len());
    for &pos in legal.group() {
        let id = mover_at(board, pos, mover)?;
        let dest = pos.neighbor(direction);
        if !board.is_free(dest) {
            return Err(GameError::StaleMove);
        }
        steps.push((id, pos, dest));
    }

    for (id, from, to) in steps {
        board.relocate(id, to);
        moves.push(PieceMove {
            piece: id,
            color: mover,
            from,
            to: Some(to),
        });
    }
    Ok(())
}
