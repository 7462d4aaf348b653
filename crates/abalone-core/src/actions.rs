//! Game actions that players can take.
//!
//! This module defines the actions the surrounding layer submits and the
//! events that result from applying them.

use crate::board::{Color, PieceId};
use crate::hex::{Direction, Position};
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move 1-3 of your pieces one step
    Move {
        /// Selected cells, in any order
        group: Vec<Position>,
        direction: Direction,
    },
    /// Both players agreed to end the game drawn
    AgreeDraw,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A piece changed cells (mover or pushed)
    PieceMoved {
        piece: PieceId,
        color: Color,
        from: Position,
        to: Position,
    },

    /// A piece was pushed off the board
    PieceCaptured {
        piece: PieceId,
        color: Color,
        from: Position,
        /// Total pieces this color has now lost
        lost: u32,
    },

    /// Turn passed to the other side
    TurnEnded { player: Color, next_player: Color },

    /// A side won by capture
    GameWon { winner: Color, captures: u32 },

    /// The game ended drawn
    GameDrawn,
}
