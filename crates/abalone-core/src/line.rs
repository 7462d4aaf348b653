//! Line detection and move classification.
//!
//! A group of 1-3 selected cells moves as a unit only if it forms a straight,
//! gap-free line. Relative to that line a move direction is either in-line
//! (parallel, can push) or broadside (sideways, translation only).

use crate::hex::{Direction, Position};
use serde::{Deserialize, Serialize};

/// Most pieces that may move together
pub const MAX_GROUP_SIZE: usize = 3;

/// How a move relates to the line of the moving group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Along the line; the only kind that can push
    Inline,
    /// Across the line; every destination must be free
    Broadside,
}

/// A straight group of 1-3 consecutive cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    /// Cells in line order (`cells[i + 1] == cells[i].neighbor(axis)`)
    cells: Vec<Position>,
    /// Step from each cell to the next; `None` for a single cell
    axis: Option<Direction>,
}

impl Line {
    /// Detect a line using the literal order of `group`.
    ///
    /// Tries the six directions in index order and returns the first one for
    /// which every adjacent pair is a single step. A single cell is a line with
    /// no axis. Empty groups and groups larger than `MAX_GROUP_SIZE` are never
    /// lines.
    pub fn detect(group: &[Position]) -> Option<Line> {
        match group.len() {
            0 => None,
            1 => Some(Line {
                cells: group.to_vec(),
                axis: None,
            }),
            n if n > MAX_GROUP_SIZE => None,
            _ => Direction::ALL
                .into_iter()
                .find(|&dir| group.windows(2).all(|pair| pair[0].neighbor(dir) == pair[1]))
                .map(|dir| Line {
                    cells: group.to_vec(),
                    axis: Some(dir),
                }),
        }
    }

    /// Detect a line regardless of the order the cells were selected in.
    ///
    /// For each axis the group is sorted by its projection onto that axis and
    /// then checked with [`Line::detect`], so a middle-first selection of three
    /// collinear cells is still recognised.
    pub fn arrange(group: &[Position]) -> Option<Line> {
        if group.len() <= 1 || group.len() > MAX_GROUP_SIZE {
            return Self::detect(group);
        }
        Direction::ALL.into_iter().find_map(|dir| {
            let mut sorted = group.to_vec();
            sorted.sort_by_key(|p| p.projection(dir));
            Self::detect(&sorted)
        })
    }

    /// Cells in line order
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Direction from each cell to the next, `None` for one cell
    pub fn axis(&self) -> Option<Direction> {
        self.axis
    }

    /// Number of cells (1-3)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Classify a move direction against this line.
    ///
    /// A single cell is in-line for every direction.
    pub fn classify(&self, direction: Direction) -> MoveKind {
        match self.axis {
            None => MoveKind::Inline,
            Some(axis) if direction == axis || direction == axis.opposite() => MoveKind::Inline,
            Some(_) => MoveKind::Broadside,
        }
    }

    /// Cells ordered front first: the cell furthest along `direction` leads.
    pub fn ordered_along(&self, direction: Direction) -> Vec<Position> {
        let mut cells = self.cells.clone();
        cells.sort_by_key(|p| std::cmp::Reverse(p.projection(direction)));
        cells
    }

    /// The leading cell when moving in `direction`
    pub fn front(&self, direction: Direction) -> Position {
        self.ordered_along(direction)[0]
    }
}
