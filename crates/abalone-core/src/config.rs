//! Rule parameters.

use crate::board::PIECES_PER_COLOR;
use crate::hex::BOARD_RADIUS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pieces a side must lose for the opponent to win in standard play
pub const CAPTURES_TO_WIN: u32 = 6;

/// Invalid rule parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Board radius {0} is too small for the standard layout (minimum 5)")]
    RadiusTooSmall(i32),

    #[error("Captures to win must be between 1 and 14, got {0}")]
    InvalidCaptureThreshold(u32),
}

/// Tunable rule parameters for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cells satisfy |q|, |r|, |s| < board_radius
    pub board_radius: i32,
    /// Pieces a side may lose before the opponent wins
    pub captures_to_win: u32,
}

impl GameConfig {
    /// Standard rules: radius 5 (61 cells), six captures to win
    pub const fn standard() -> Self {
        Self {
            board_radius: BOARD_RADIUS,
            captures_to_win: CAPTURES_TO_WIN,
        }
    }

    /// Check the parameters describe a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_radius < BOARD_RADIUS {
            return Err(ConfigError::RadiusTooSmall(self.board_radius));
        }
        if self.captures_to_win == 0 || self.captures_to_win as usize > PIECES_PER_COLOR {
            return Err(ConfigError::InvalidCaptureThreshold(self.captures_to_win));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
