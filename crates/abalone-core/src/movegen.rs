//! Legal move enumeration.
//!
//! Every straight group of 1-3 own pieces is generated exactly once by
//! extending from each piece along the three "forward" axes only (East,
//! NorthEast, NorthWest); the other three axes would produce the same groups
//! in reverse. Each group is then validated in all six directions.

use crate::game::GameState;
use crate::hex::{Direction, Position};
use crate::line::MAX_GROUP_SIZE;
use crate::rules::{self, LegalMove};

const FORWARD_AXES: [Direction; 3] = [Direction::East, Direction::NorthEast, Direction::NorthWest];

/// All straight groups of the side to move, each listed once
pub fn candidate_groups(state: &GameState) -> Vec<Vec<Position>> {
    let board = state.board();
    let player = state.current_player();
    let mut groups = Vec::new();

    for piece in board.pieces_of(player) {
        groups.push(vec![piece.position]);
        for axis in FORWARD_AXES {
            let mut group = vec![piece.position];
            let mut next = piece.position.neighbor(axis);
            while group.len() < MAX_GROUP_SIZE && board.color_at(next) == Some(player) {
                group.push(next);
                groups.push(group.clone());
                next = next.neighbor(axis);
            }
        }
    }
    groups
}

/// Every legal move for the side to move; empty once the game is over
pub fn legal_moves(state: &GameState) -> Vec<LegalMove> {
    if state.is_finished() {
        return Vec::new();
    }
    candidate_groups(state)
        .iter()
        .flat_map(|group| {
            Direction::ALL.into_iter().filter_map(move |dir| {
                rules::validate(group, dir, state.board(), state.current_player()).ok()
            })
        })
        .collect()
}
